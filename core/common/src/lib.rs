//! Common utilities and types shared across Cirrus crates.
//!
//! This module provides the error taxonomy and the small value types used by
//! the remote item layer and its front ends.

pub mod error;
pub mod types;

pub use error::{Error, PartialError, Result};
pub use types::{AccessToken, DrivePath};
