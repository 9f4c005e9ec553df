//! # brokkr-core
//!
//! Core library for Brokkr providing:
//! - Shared error and result types used across the workspace

pub mod error;

pub use error::{Error, Result};
