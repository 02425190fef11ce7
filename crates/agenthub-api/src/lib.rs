//! # agenthub-api
//!
//! HTTP API layer for AgentHub built on Axum.
//!
//! Exposes the plugin management surface (list, inspect, enable, disable,
//! reload) plus health, with a standard response envelope and error
//! mapping from the domain error types.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;
