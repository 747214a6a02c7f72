//! # Modules
//!
//! Lifecycle orchestration for the platform's subsystems.
//!
//! Each subsystem implements [`Module`], names itself with a [`ModuleId`] and lists the ids it
//! depends on. [`ModuleManager`] enables them so that every dependency is enabled first,
//! rejecting duplicate registrations, unknown dependencies and cycles before any hook runs.

mod error;
mod manager;
mod module;

pub use crate::error::{ModuleError, ModuleErrorExt};
pub use crate::manager::ModuleManager;
pub use crate::module::{Module, ModuleId};
