//! Core types shared across the promptforge pipeline.
//!
//! Currently this is the top-level error taxonomy and its user-facing
//! presentation helpers; the component-specific error types live with
//! their components and are aggregated here.

pub mod error;

pub use error::{ErrorContext, ForgeError, user_friendly_error};
