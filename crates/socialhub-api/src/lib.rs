//! # socialhub-api
//!
//! HTTP layer built on Axum: the live-channel upgrade at `/ws`, the
//! notification REST endpoints the CRUD layer and clients call, presence
//! and health endpoints, plus CORS, logging and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
