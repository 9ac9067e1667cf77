//! Core types and trait definitions for the Parley review portal.
//!
//! This crate is deliberately free of HTTP and filesystem dependencies.
//! All other crates depend on it; it depends on nothing proprietary.

pub mod assignment;
pub mod error;
pub mod session;
pub mod store;
pub mod submission;

pub use error::{Error, Result};
