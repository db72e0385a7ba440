//! Infrastructure Services
//!
//! Collaborators the form composers talk to:
//!
//! - **client**: REST client and the submit/options adapters built on it
//! - **config**: configuration with LocalStorage overrides
//! - **errors**: error types for submission, storage, files and the client
//! - **notify**: notification sink contract
//! - **storage**: draft snapshot stores
//! - **submit**: async submit contract
//! - **session**: current user context
//!
//! Async traits are declared without Send bounds, as everything runs on the
//! browser event loop.

pub mod client;
pub mod config;
pub mod errors;
pub mod notify;
pub mod session;
pub mod storage;
pub mod submit;
