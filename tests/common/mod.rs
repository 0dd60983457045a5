//! Common test utilities for tfkit.
//!
//! This module provides shared utilities for the integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;
pub mod image_utils;
