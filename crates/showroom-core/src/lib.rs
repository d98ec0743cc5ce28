//! Core types for the Showroom engine.
//!
//! This crate provides the foundational types used across all other showroom crates:
//! - Value types (colors)
//! - The closed product catalog (`ProductState` -> `StateConfig`)
//! - Live material uniforms driven by the transition director
//! - Error types

pub mod catalog;
pub mod errors;
pub mod types;
pub mod uniforms;

pub use catalog::*;
pub use errors::*;
pub use types::*;
pub use uniforms::*;
