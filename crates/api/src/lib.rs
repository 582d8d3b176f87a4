//! Pressdesk API server library.
//!
//! Exposes config, state, error handling, auth, routes and the deadline
//! workflow so integration tests and the binary entrypoint share them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod workflow;
