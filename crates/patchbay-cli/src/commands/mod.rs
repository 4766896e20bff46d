//! CLI command implementations.

pub mod check;
pub mod common;
pub mod export;
pub mod factory;
pub mod modules;
