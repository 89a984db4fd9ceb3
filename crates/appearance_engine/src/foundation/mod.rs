//! Foundation module - Core utilities and types
//!
//! This module provides small utilities shared by the resolvers:
//! - Math aliases and bounding-box helpers
//! - Logging setup

pub mod logging;
pub mod math;
