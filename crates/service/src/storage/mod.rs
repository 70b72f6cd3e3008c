//! Storage abstractions for service layer
//!
//! Contains reusable file-backed stores that persist small collections as JSON.

pub mod json_list_store;
