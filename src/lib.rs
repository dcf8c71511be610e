//! checkcam library crate.
//!
//! This module exposes the capture pipeline components for integration
//! testing and for embedding applications.

pub mod capture;
pub mod config;
pub mod platform;
