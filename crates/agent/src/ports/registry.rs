//! Registry port — snapshot access to entities, areas, and devices.

use std::future::Future;
use std::sync::Arc;

use parlor_domain::error::RegistryError;
use parlor_domain::registry::RegistrySnapshot;

/// Read-only access to the entity/area/device registry.
///
/// One snapshot is taken per conversation turn so all filter stages observe
/// consistent state. Exposure overrides in the snapshot are those of the
/// requesting `assistant`.
pub trait Registry: Send + Sync {
    /// Take a snapshot of the registry as of now.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError`] when the backing store cannot be read.
    fn snapshot(
        &self,
        assistant: &str,
    ) -> impl Future<Output = Result<RegistrySnapshot, RegistryError>> + Send;
}

impl<T: Registry + ?Sized> Registry for Arc<T> {
    fn snapshot(
        &self,
        assistant: &str,
    ) -> impl Future<Output = Result<RegistrySnapshot, RegistryError>> + Send {
        T::snapshot(self, assistant)
    }
}

impl<T: Registry + ?Sized> Registry for &T {
    fn snapshot(
        &self,
        assistant: &str,
    ) -> impl Future<Output = Result<RegistrySnapshot, RegistryError>> + Send {
        T::snapshot(self, assistant)
    }
}
