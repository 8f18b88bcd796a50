//! # forumstyle engine
//!
//! Core library for switching the visual theme of a static forum site.
//! It discovers themes published under `themes/<id>/`, remembers the
//! reader's choice and applies a theme to a page by swapping its two
//! stylesheet links, injecting theme fragments and rendering per-forum
//! descriptions.
//!
//! ## Modules
//!
//! - [`catalog`] - Theme discovery, id validation and display names
//! - [`applier`] - Applying a theme to a page
//! - [`controller`] - Page-lifecycle controller that owns the session state
//! - [`page`] - Page abstraction, slot binding and the in-memory page model
//! - [`persistence`] - Durable key-value stores and the saved selection
//! - [`source`] - Asset sources (HTTP, local checkout, scripted)
//! - [`model`] - Theme descriptors, the catalog and description manifests
//! - [`common`] - Error types shared by all modules

pub mod applier;
pub mod catalog;
pub mod common;
pub mod controller;
pub mod model;
pub mod page;
pub mod persistence;
pub mod source;

pub use applier::{ApplyOutcome, ApplyReport, ThemeApplier};
pub use catalog::{CatalogConfig, ThemeDiscovery};
pub use controller::{ControllerSettings, ThemeController};
pub use model::{DEFAULT_THEME, ThemeCatalog, ThemeDescriptor};
