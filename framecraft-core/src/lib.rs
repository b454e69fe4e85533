//! framecraft core library
//!
//! This crate provides the error type and the field value encoding shared by
//! the header model and the command-line frontend.

pub mod error;
pub mod types;
pub mod value;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use value::{byte_width, encode_uint, parse_bytes, parse_value};
