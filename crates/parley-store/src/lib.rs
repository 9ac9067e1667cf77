//! Flat-file implementation of [`parley_core::store::ReviewStore`].
//!
//! Persistence is deliberately simple: a CSV distribution sheet (read-only
//! except for an admin full replace), a CSV submission log, and uploaded
//! review files on disk. Every persisted write goes through
//! write-temp-then-rename in the target directory, so a crash mid-write
//! never corrupts the previous file. There is no locking — two simultaneous
//! admin writers race, last write wins; acceptable for single-admin
//! classroom use.

mod atomic;
pub mod distribution;
pub mod error;
pub mod export;
pub mod log;
pub mod store;
pub mod uploads;

pub use error::{Error, Result};
pub use store::{FlatFileStore, StorePaths};
