//! Shared types for the Parley chat message store.
//!
//! `Message` is both the stored record and the JSON body exchanged over HTTP.

pub mod models;

pub use models::Message;
