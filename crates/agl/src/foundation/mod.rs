//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the toolkit:
//! - Math types and transform constructors
//! - Colors
//! - Handle-based collections
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod color;
pub mod collections;
pub mod time;
pub mod logging;
