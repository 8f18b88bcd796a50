//! # forumstyle
//!
//! Command-line host for the forumstyle theme engine. It reads
//! `forumstyle.toml` and the environment, builds an asset source, a page
//! and a saved-selection store, and runs the theme lifecycle against them.

pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod logger;

pub use commands::{Command, execute};
pub use error::{AppError, AppResult};
pub use host::{Overrides, Session};
