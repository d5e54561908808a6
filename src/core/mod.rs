//! Core constants, collaborator traits, and error types.
//!
//! This module has no dependencies on the rest of the crate and defines the
//! seams where the surrounding system plugs in.

mod constants;
mod error;
mod traits;

pub use constants::*;
pub use error::*;
pub use traits::*;
