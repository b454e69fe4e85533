//! CLI interface for framecraft
//!
//! This crate provides the command-line interface for framecraft,
//! including argument parsing and frame descriptions.

pub mod args;
pub mod frame_args;

pub use args::{Cli, Commands};
pub use frame_args::{build_frame, parse_frame};
