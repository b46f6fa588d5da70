//! Deferred reference to a hierarchy under construction.
//!
//! Command actions are written before the hierarchy they live in exists. A
//! [`HierarchyHandle`] is handed out by the builder, captured by actions, and
//! bound exactly once when `build()` completes. It holds a weak reference, so
//! the hierarchy owning the actions is not kept alive by them.

use alloc::boxed::Box;
use alloc::sync::{Arc, Weak};
use core::fmt;

use once_cell::race::OnceBox;

use crate::error::BuildError;
use crate::tree::Hierarchy;

/// Write-once handle to a hierarchy.
#[derive(Clone, Default)]
pub struct HierarchyHandle {
    target: Arc<OnceBox<Weak<Hierarchy>>>,
}

impl HierarchyHandle {
    /// Unbound handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind the handle. Fails with `AlreadyBound` on any second call.
    pub fn bind(&self, hierarchy: &Arc<Hierarchy>) -> Result<(), BuildError> {
        self.target
            .set(Box::new(Arc::downgrade(hierarchy)))
            .map_err(|_| BuildError::AlreadyBound)
    }

    /// The bound hierarchy, if bound and still alive.
    pub fn get(&self) -> Option<Arc<Hierarchy>> {
        self.target.get().and_then(Weak::upgrade)
    }

    /// True once `bind` has succeeded.
    pub fn is_bound(&self) -> bool {
        self.target.get().is_some()
    }
}

impl fmt::Debug for HierarchyHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HierarchyHandle")
            .field("bound", &self.is_bound())
            .finish()
    }
}
