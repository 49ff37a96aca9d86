//! Error handling for promptforge.
//!
//! The pipeline follows two principles:
//!
//! 1. **Strongly-typed errors**: every component returns its own
//!    `thiserror` enum; [`ForgeError`] aggregates them into one taxonomy
//!    with four categories: configuration, input validation, resolution,
//!    and duplicate/shape errors.
//! 2. **Machine-stable core, human-friendly edge**: core `Display`
//!    messages are short and stable; [`user_friendly_error`] is the only
//!    place where errors grow colored output, details, and suggestions.
//!
//! Nothing in the core panics for an expected failure. Validation problems
//! are accumulated into lists so a user sees every problem in one pass
//! rather than fixing them one run at a time.

use colored::Colorize;
use std::fmt;
use thiserror::Error;

use crate::classify::CreationError;
use crate::resolver::ResolveError;
use crate::transform::ParamsError;
use crate::variables::CollectorError;

/// The aggregated error type for a promptforge job.
#[derive(Debug, Clone, Error)]
pub enum ForgeError {
    /// Classification failed (user input or missing pattern).
    #[error(transparent)]
    Creation(#[from] CreationError),

    /// Template or schema resolution failed.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// Variable collection failed; carries every recorded problem.
    #[error("variable collection failed with {} error(s)", .errors.len())]
    Collection { errors: Vec<CollectorError> },

    /// Flattening into renderer parameters failed.
    #[error(transparent)]
    Params(#[from] ParamsError),

    /// A configuration problem outside the typed component errors.
    #[error("configuration error: {message}")]
    Config { message: String },
}

impl From<Vec<CollectorError>> for ForgeError {
    fn from(errors: Vec<CollectorError>) -> Self {
        Self::Collection { errors }
    }
}

impl ForgeError {
    /// Whether the failure is a configuration problem (fatal, never
    /// retried) as opposed to a user-input problem.
    pub fn is_config_error(&self) -> bool {
        match self {
            Self::Config { .. } => true,
            Self::Creation(e) => e.is_config_error(),
            Self::Resolve(e) => matches!(e, ResolveError::MissingBaseDirectory { .. }),
            Self::Collection { .. } | Self::Params(_) => false,
        }
    }
}

/// A [`ForgeError`] decorated for terminal presentation.
///
/// Suggestions are actionable next steps (shown green); details explain
/// what was tried (shown yellow). The core never constructs these; only
/// the presentation edge does, via [`user_friendly_error`].
#[derive(Debug)]
pub struct ErrorContext {
    pub error: ForgeError,
    pub suggestion: Option<String>,
    pub details: Option<String>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(error: ForgeError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Prints the error to stderr with color.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Converts any error into an [`ErrorContext`] with category-appropriate
/// details and suggestions.
///
/// Walks the error chain looking for a [`ForgeError`]; anything else gets
/// a generic configuration wrapper so the CLI always has something
/// presentable.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let mut current: &dyn std::error::Error = error.as_ref();
    loop {
        if let Some(forge_error) = current.downcast_ref::<ForgeError>() {
            return create_error_context(forge_error);
        }
        match current.source() {
            Some(source) => current = source,
            None => break,
        }
    }

    ErrorContext::new(ForgeError::Config {
        message: format!("{error:#}"),
    })
}

fn create_error_context(error: &ForgeError) -> ErrorContext {
    let ctx = ErrorContext::new(error.clone());
    match error {
        ForgeError::Creation(creation) => match creation {
            CreationError::EmptyInput { axis } => {
                ctx.with_suggestion(format!("Provide a non-empty {axis} value"))
            }
            CreationError::UnknownValue {
                axis, suggestions, ..
            } => {
                if suggestions.is_empty() {
                    ctx.with_suggestion(format!(
                        "Check the configured {axis} pattern for accepted values"
                    ))
                } else {
                    ctx.with_suggestion(format!("Did you mean: {}?", suggestions.join(", ")))
                }
            }
            CreationError::MissingPattern { axis } => ctx
                .with_suggestion(format!(
                    "Fix the {axis}_pattern entry in your settings file"
                ))
                .with_details("The configured pattern is missing or not a valid regex"),
        },
        ForgeError::Resolve(resolve) => match resolve {
            ResolveError::MissingBaseDirectory { kind } => ctx
                .with_suggestion(format!(
                    "Set the {kind} base directory in your settings file"
                ))
                .with_details(
                    "An empty base directory is never replaced with the current directory",
                ),
            ResolveError::NotFound {
                candidates,
                base_dir,
                ..
            } => {
                let tried = candidates
                    .iter()
                    .map(|c| format!("  - {}", c.display()))
                    .collect::<Vec<_>>()
                    .join("\n");
                ctx.with_details(format!(
                    "Searched under {}:\n{tried}",
                    base_dir.display()
                ))
                .with_suggestion("Create one of the listed files or point the base directory at the right location")
            }
        },
        ForgeError::Collection { errors } => {
            let listed =
                errors.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n");
            ctx.with_details(listed)
                .with_suggestion("Fix every listed variable problem and retry")
        }
        ForgeError::Params(_) => {
            ctx.with_suggestion("Resolve a template before building renderer parameters")
        }
        ForgeError::Config { .. } => ctx,
    }
}
