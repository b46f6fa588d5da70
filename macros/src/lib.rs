use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, LitStr, Variant, parse_macro_input};

/// Derives the `ParamEnum` trait for enums.
///
/// The enum can then back a parameter restricted to its variant names with
/// `Param::enumeration::<T>()`, and be read back with
/// `CommandArgs::enumeration::<T>()`.
///
/// # Example
///
/// ```ignore
/// use trie_shell::ParamEnum;
///
/// #[derive(Debug, Copy, Clone, PartialEq, ParamEnum)]
/// pub enum Level {
///     Low,
///     High,
///     #[param(rename = "max")]
///     Maximum,
/// }
/// ```
///
/// This generates:
///
/// ```ignore
/// impl ParamEnum for Level {
///     const VARIANTS: &'static [&'static str] = &["Low", "High", "max"];
///
///     fn from_name(name: &str) -> Option<Self> {
///         match name {
///             "Low" => Some(Self::Low),
///             "High" => Some(Self::High),
///             "max" => Some(Self::Maximum),
///             _ => None,
///         }
///     }
///
///     fn name(&self) -> &'static str {
///         match self {
///             Self::Low => "Low",
///             Self::High => "High",
///             Self::Maximum => "max",
///         }
///     }
/// }
/// ```
///
/// # Requirements
///
/// - The type must be an enum
/// - All variants must be unit variants (no fields)
/// - Variant names (or their `rename`) are the accepted values
#[proc_macro_derive(ParamEnum, attributes(param))]
pub fn derive_param_enum(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let variants = match &input.data {
        Data::Enum(data_enum) => &data_enum.variants,
        _ => {
            return syn::Error::new_spanned(&input, "ParamEnum can only be derived for enums")
                .to_compile_error()
                .into();
        }
    };

    let mut idents = Vec::with_capacity(variants.len());
    let mut names = Vec::with_capacity(variants.len());
    for variant in variants {
        if !matches!(variant.fields, Fields::Unit) {
            return syn::Error::new_spanned(
                variant,
                "ParamEnum can only be derived for enums with unit variants (no fields)",
            )
            .to_compile_error()
            .into();
        }

        match value_name(variant) {
            Ok(value) => {
                if names.contains(&value) {
                    return syn::Error::new_spanned(
                        variant,
                        format!("duplicate ParamEnum value '{}'", value),
                    )
                    .to_compile_error()
                    .into();
                }
                idents.push(&variant.ident);
                names.push(value);
            }
            Err(error) => return error.to_compile_error().into(),
        }
    }

    let expanded = quote! {
        impl ::trie_shell::param::ParamEnum for #name {
            const VARIANTS: &'static [&'static str] = &[#(#names),*];

            fn from_name(name: &str) -> ::core::option::Option<Self> {
                match name {
                    #(#names => ::core::option::Option::Some(Self::#idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#idents => #names,)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Value name of a variant: `#[param(rename = "...")]` or the identifier.
fn value_name(variant: &Variant) -> syn::Result<String> {
    let mut renamed = None;
    for attr in variant.attrs.iter().filter(|a| a.path().is_ident("param")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                renamed = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported param attribute, expected `rename`"))
            }
        })?;
    }
    Ok(renamed.unwrap_or_else(|| variant.ident.to_string()))
}
