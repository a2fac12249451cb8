//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

pub mod diagnostic_helpers;
pub mod hir_helpers;
