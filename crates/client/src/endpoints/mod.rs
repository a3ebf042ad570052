//! Typed wrappers over the backend endpoint surface, one module per area.
//!
//! Where the backend owns the payload shape (generation inputs, analysis
//! results) these pass `serde_json::Value` through untouched; only shapes
//! the client itself depends on (auth) are typed.

pub mod auth;
pub mod campaigns;
pub mod competitor;
pub mod instagram;
pub mod intelligence;
pub mod leads;
pub mod memory;
pub mod pitch;
pub mod products;
pub mod simulator;

pub use auth::AuthResponse;
