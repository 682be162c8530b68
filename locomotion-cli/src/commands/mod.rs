//! CLI command implementations.

pub mod common;
pub mod config;
pub mod route;
pub mod run;
