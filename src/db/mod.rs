//! Database layer (Firestore).

pub mod firestore;
pub mod memory;

pub use firestore::{FirestoreDb, MemberUpdate, TeamDelete};
pub use memory::MemoryStore;

/// Collection names as constants.
pub mod collections {
    pub const TEAMS: &str = "teams";
    /// User profiles (keyed by uid)
    pub const USERS: &str = "users";
}
