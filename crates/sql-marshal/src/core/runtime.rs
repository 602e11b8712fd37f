//! Capability object for the embedding runtime.

use super::value::{DynStr, DynValue};
use crate::error::Result;

/// The two facilities only the embedding runtime can provide.
///
/// Components hold a reference to an adapter instead of reaching for a
/// process-wide handle, so embedders control exactly which runtime a
/// decoder talks to and tests can substitute a stub.
pub trait RuntimeAdapter {
    /// Resolve a type/constant name to a runtime value.
    ///
    /// The name arrives tainted: it was read from the database and must not
    /// be trusted until the runtime's own resolution facility has vetted it.
    fn resolve_constant(&self, name: &DynStr) -> Result<DynValue>;

    /// Deserialize a value from the runtime's native object format.
    fn deserialize_object(&self, bytes: &[u8]) -> Result<DynValue>;
}
