//! Utility functions and helpers.
//!
//! - [`paths`]: tilde expansion, lexical normalization and non-strict
//!   canonicalization used by the path resolver

/// Path manipulation and resolution utilities
pub mod paths;

pub use paths::{expand_tilde, resolve};
