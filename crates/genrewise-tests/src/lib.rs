//! Genrewise Integration Test Infrastructure
//!
//! This crate provides workspace-level tests for classification flows:
//!
//! - Classification: request -> facts -> ranked recommendations
//! - Rule book loading: files on disk, validation failures
//! - **Properties**: ordering, stability, idempotence, and isolation
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p genrewise-tests
//! ```

pub mod fixtures;
