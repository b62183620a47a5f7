//! # ZipFood Reset Flow
//!
//! The client-side state machine behind the password reset screen:
//! phone entry, code verification, new password, success. Rendering is
//! the host's job; this crate owns the step transitions, input
//! sanitization, resend cooldown, and error mapping, against an abstract
//! [`ResetApi`].

mod api;
mod flow;

pub use api::{CodeRequested, RateLimitSnapshot, ResetApi};
pub use flow::{format_phone_display, ResetFlow, ResetStep};
