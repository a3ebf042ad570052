//! Skald API Client
//!
//! Single choke point for every call the workspace makes to the Skald
//! backend.
//!
//! This crate provides:
//! - [`ApiClient`]: JSON transport with bearer injection and bounded retry
//! - [`FrameParser`]: incremental parser for streamed generation tokens
//! - [`SessionStore`]: durable token + user persistence, injected not ambient
//! - Typed wrappers for the backend endpoint surface (see [`endpoints`])

pub mod api;
pub mod endpoints;
pub mod error;
pub mod policy;
pub mod session;
pub mod sse;

pub use api::ApiClient;
pub use error::ApiError;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore, SessionUser};
pub use sse::{FrameParser, StreamFrame};
