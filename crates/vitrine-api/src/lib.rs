//! Vitrine HTTP API.
//!
//! One HTTP surface replaces the original deployment's three near-identical
//! server variants; route aliases cover the differences.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod handlers;
pub mod server;
pub mod state;

pub use config::Config;
pub use server::{create_router, start_server};
pub use state::AppState;
