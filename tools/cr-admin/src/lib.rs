//! CR-Admin: terminal shell for the certificate desk.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod cli;
pub mod commands;
pub mod files;
pub mod render;

pub use cli::{Args, Command};
