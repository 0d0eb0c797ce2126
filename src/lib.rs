//! Strata - layered code-unit loader
//!
//! Resolves named compiled units and resources from directory trees and
//! zip archives registered at runtime, deferring to a host loader, with
//! concurrent positive and negative result caching.

pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod source;
pub mod ui;

pub use error::{StrataError, StrataResult};
pub use loader::{HostLoader, LoadedUnit, LoaderOptions, ResourceUrl, UnitLoader};
