//! Genrewise CLI library.
//!
//! This crate provides the command implementations behind the `genrewise`
//! binary, plus rule book resolution and logging setup.

pub mod commands;
pub mod config;
pub mod logging;
