//! Repository traits consumed by the check-in engine.
//!
//! Both are synchronous: every engine operation runs to completion,
//! including its storage call, before the next UI event is handled.

use super::model::{CheckIn, CheckInSession};
use crate::error::Result;

/// The single storage slot holding the in-progress session snapshot.
///
/// # Implementation Notes
///
/// Implementations should handle:
/// - Last-write-wins semantics (no versioning of individual writes)
/// - Schema versioning of the stored document
/// - Reporting unreadable payloads as `Serialization`/`Migration` errors so
///   the engine can tell corruption apart from an unreachable store
pub trait SessionSnapshotRepository: Send + Sync {
    /// Reads the snapshot slot.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(session))`: A snapshot was found and decoded
    /// - `Ok(None)`: The slot is empty
    /// - `Err(_)`: The slot could not be read or decoded
    fn load(&self) -> Result<Option<CheckInSession>>;

    /// Overwrites the snapshot slot with `session`.
    fn save(&self, session: &CheckInSession) -> Result<()>;

    /// Empties the snapshot slot. Clearing an empty slot succeeds.
    fn clear(&self) -> Result<()>;
}

/// Durable storage for completed and abandoned check-in records.
///
/// The engine only ever calls [`save`](CheckInRepository::save); the read
/// methods serve history views.
pub trait CheckInRepository: Send + Sync {
    /// Persists a terminated check-in record.
    ///
    /// # Arguments
    ///
    /// * `record` - A record whose status is `completed` or `abandoned`
    fn save(&self, record: &CheckIn) -> Result<()>;

    /// Finds a record by its id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(record))`: Record found
    /// - `Ok(None)`: Record not found
    /// - `Err(_)`: Error occurred during retrieval
    fn find_by_id(&self, check_in_id: &str) -> Result<Option<CheckIn>>;

    /// Lists all stored records, most recently started first.
    fn list_all(&self) -> Result<Vec<CheckIn>>;
}
