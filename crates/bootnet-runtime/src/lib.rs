//! # bootnet Runtime Library
//!
//! The bootstrap sequence behind the `bootnet` binary, exposed for
//! integration tests and embedders.
//!
//! ## Modules
//!
//! - `provision` - chain directory
//! - `identity` - boot node key file
//! - `account` - password generation
//! - `genesis` - genesis template rendering
//! - `ports` / `adapters` - discovery and keystore collaborators
//! - `bootstrap` - the sequence itself

#![warn(clippy::all)]

pub mod account;
pub mod adapters;
pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod genesis;
pub mod identity;
pub mod ports;
pub mod provision;

pub use bootstrap::{BootstrapReport, Bootstrapper};
pub use config::{AccountConfig, BootstrapConfig};
pub use errors::{BootstrapError, BootstrapStage};
