//! Command-line interface for Serenade.
//!
//! This module provides the CLI argument parsing using clap's derive macros
//! and command implementations.
//!
//! # Architecture
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`keys`] - Keyboard mapping for the terminal flow

pub mod args;
pub mod commands;
pub mod keys;

pub use args::{CheckArgs, Cli, Commands, CompletionsArgs, InitArgs, RunArgs, SchemaArgs};
pub use commands::{Command, CommandDispatcher, CommandResult};
