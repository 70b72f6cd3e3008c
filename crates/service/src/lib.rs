//! Service layer for the student roster.
//! - `roster`: the record store and the repository seam the shell talks to.
//! - `storage`: reusable JSON file persistence.
//! - `errors`: the error kinds every store operation reports.

pub mod errors;
pub mod roster;
pub mod storage;

pub use errors::ServiceError;
pub use roster::{RosterStore, StudentRepository};
