//! Account values, contribution accounting, and authorization.
//!
//! Accounts live in an external identity system; this module only defines the
//! value type the core consumes plus the stateless services attached to it:
//! the role hierarchy, the contribution ledger, and the access policy. Keeping
//! these as free functions over `Account` values avoids coupling the core to
//! any particular identity representation.

pub mod ledger;
pub mod policy;
pub mod role;

use serde::{Deserialize, Serialize};

pub use ledger::{
    PASSKEY_LENGTH, Ratio, ensure_passkey, format_bytes, format_seed_time, generate_passkey,
    generate_passkey_with, meets_ratio_requirement, meets_requirement,
    meets_seed_time_requirement, ratio, regenerate_passkey,
};
pub use policy::{can_create, can_delete, can_update};
pub use role::{Role, RoleParseError};

/// Opaque account identifier assigned by the identity system.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct AccountId(u64);

impl AccountId {
    /// Creates AccountId from a raw identifier.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the underlying identifier as u64.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for AccountId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of an account as supplied by the identity collaborator.
///
/// Counters are cumulative bytes and seconds. The passkey is the opaque
/// credential the wire protocol identifies accounts by; its uniqueness across
/// accounts is a unique-index obligation of the backing store. Deleting an
/// account cascades to its catalog entries, an invariant the durable store
/// implements (see `CatalogStore::remove_owned_by`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    pub role: Role,
    pub uploaded: u64,
    pub downloaded: u64,
    pub seed_time: u64,
    pub passkey: Option<String>,
}
