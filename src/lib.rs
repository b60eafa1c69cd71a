pub mod api;
pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod poller;
pub mod reporter;
pub mod state;
pub mod types;

pub use error::{BotError, Result};
