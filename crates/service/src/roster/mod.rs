//! Student roster: the in-memory record collection and its JSON backing file.

pub mod repository;
pub mod store;

pub use repository::StudentRepository;
pub use store::RosterStore;
