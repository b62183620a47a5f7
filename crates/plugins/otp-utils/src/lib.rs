//! # ZipFood Auth OTP Utilities
//!
//! Shared utilities for one-time reset codes across auth plugins.
//! This crate provides:
//! - Numeric reset-code generation
//! - Send-rate limiting logic
//! - Reset-code records with expiry checking

mod generator;
mod rate_limit;
mod verification;

pub use generator::{CodeConfig, CodeGenerator};
pub use rate_limit::{RateLimitConfig, RateLimitResult, RateLimitStats, RateLimiter};
pub use verification::{is_code_shape, CodeCheck, ResetCodeRecord};
