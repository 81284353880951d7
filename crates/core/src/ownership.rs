//! Single-role authorization: a resource belongs to the user who created it.
//!
//! Callers resolve existence first (missing resources are `NotFound` for
//! everyone), then ask [`ensure_owner`] whether the verified caller may touch
//! the loaded resource.

use crate::error::CoreError;
use crate::types::DbId;

/// A resource with exactly one owning user.
pub trait Owned {
    /// The id of the user that created the resource. Never changes.
    fn owner_id(&self) -> DbId;
}

/// Reject the caller unless they own `resource`.
pub fn ensure_owner<R: Owned>(resource: &R, caller: DbId) -> Result<(), CoreError> {
    if resource.owner_id() != caller {
        return Err(CoreError::Forbidden("User not authorized".into()));
    }
    Ok(())
}
