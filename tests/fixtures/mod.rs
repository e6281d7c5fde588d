//! Test fixtures and data generators
//!
//! This module contains builders and generators for creating VGM test data.

pub mod builders;

pub use builders::*;
