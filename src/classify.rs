//! Classification values and their factory.
//!
//! A prompt job is classified by two tokens: a *directive* (the kind of
//! transformation requested, e.g. `to` or `summary`) and a *layer* (the
//! granularity it targets, e.g. `project` or `issue`). Both are validated
//! against configured patterns before anything downstream runs, and the
//! validated values are immutable from then on.
//!
//! Validation is deliberately strict: case-sensitive, no trimming. A token
//! with stray whitespace fails rather than being silently repaired, so the
//! resolved template path always reflects exactly what the user typed.
//!
//! # Examples
//!
//! ```rust
//! use promptforge::classify::ClassificationFactory;
//! use promptforge::pattern::PatternSet;
//!
//! let patterns = PatternSet::from_sources("^(to|summary)$", "^(project|issue)$");
//! let factory = ClassificationFactory::new(&patterns);
//!
//! let classification = factory.create("to", "project").unwrap();
//! assert_eq!(classification.directive.as_str(), "to");
//! assert_eq!(classification.layer.as_str(), "project");
//!
//! assert!(factory.create("TO", "project").is_err());
//! ```

use thiserror::Error;
use tracing::debug;

use crate::pattern::{ClassPattern, PatternSet};

/// Maximum number of near-match suggestions attached to an unknown-value error.
const MAX_SUGGESTIONS: usize = 3;

/// The classification axis an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Directive,
    Layer,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Directive => write!(f, "directive"),
            Self::Layer => write!(f, "layer"),
        }
    }
}

/// Validated directive token.
///
/// Only the [`ClassificationFactory`] constructs these; the inner string is
/// guaranteed to have matched the active directive pattern at creation and
/// is never mutated afterward.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Directive(String);

/// Validated layer token. Same construction guarantee as [`Directive`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Layer(String);

impl Directive {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Layer {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A validated (directive, layer) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub directive: Directive,
    pub layer: Layer,
}

/// Failure to create a classification value.
///
/// `MissingPattern` is a configuration problem and `EmptyInput` /
/// `UnknownValue` are user-input problems; callers surface them differently.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreationError {
    /// The input was empty or whitespace-only.
    #[error("{axis} input is empty")]
    EmptyInput { axis: Axis },

    /// The input did not match the active pattern for its axis.
    #[error("unknown {axis} value '{value}'")]
    UnknownValue {
        axis: Axis,
        value: String,
        /// Near matches against the known-value list, or the full known
        /// list when no near match exists. Empty when no values are known.
        suggestions: Vec<String>,
    },

    /// No usable pattern is configured for this axis.
    #[error("no valid {axis} pattern is configured")]
    MissingPattern { axis: Axis },
}

impl CreationError {
    /// The axis this error refers to.
    pub fn axis(&self) -> Axis {
        match self {
            Self::EmptyInput { axis }
            | Self::UnknownValue { axis, .. }
            | Self::MissingPattern { axis } => *axis,
        }
    }

    /// Whether this is a configuration error rather than a user-input error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::MissingPattern { .. })
    }
}

/// Factory producing validated [`Classification`] values.
///
/// A pure function of its inputs and the active patterns: no filesystem
/// access, no side effects beyond trace logging.
#[derive(Debug, Clone)]
pub struct ClassificationFactory<'a> {
    patterns: &'a PatternSet,
}

impl<'a> ClassificationFactory<'a> {
    pub fn new(patterns: &'a PatternSet) -> Self {
        Self { patterns }
    }

    /// Validates both raw tokens and returns the classification pair.
    ///
    /// The directive is checked before the layer; the first failing axis is
    /// reported. Unknown values carry up to [`MAX_SUGGESTIONS`] prefix or
    /// substring matches from the known-value list, or the whole list when
    /// no such match exists.
    ///
    /// # Errors
    ///
    /// - [`CreationError::MissingPattern`] when the axis has no usable
    ///   configured pattern (configuration error)
    /// - [`CreationError::EmptyInput`] for empty or whitespace-only input
    /// - [`CreationError::UnknownValue`] when the input fails the pattern
    pub fn create(
        &self,
        raw_directive: &str,
        raw_layer: &str,
    ) -> Result<Classification, CreationError> {
        let directive = self.validate(
            Axis::Directive,
            raw_directive,
            self.patterns.directive_pattern(),
            self.patterns.known_directives(),
        )?;
        let layer = self.validate(
            Axis::Layer,
            raw_layer,
            self.patterns.layer_pattern(),
            self.patterns.known_layers(),
        )?;

        debug!("Classified job as {}/{}", directive, layer);
        Ok(Classification {
            directive: Directive(directive),
            layer: Layer(layer),
        })
    }

    fn validate(
        &self,
        axis: Axis,
        raw: &str,
        pattern: Option<&ClassPattern>,
        known: &[String],
    ) -> Result<String, CreationError> {
        // Emptiness is checked before the pattern so that "  " reports
        // EmptyInput rather than UnknownValue.
        if raw.trim().is_empty() {
            return Err(CreationError::EmptyInput { axis });
        }

        let Some(pattern) = pattern else {
            return Err(CreationError::MissingPattern { axis });
        };

        if pattern.matches(raw) {
            Ok(raw.to_string())
        } else {
            Err(CreationError::UnknownValue {
                axis,
                value: raw.to_string(),
                suggestions: suggest_values(raw, known),
            })
        }
    }
}

/// Finds candidate values resembling an unknown input.
///
/// Prefix and substring matches come first; when none exist, the full
/// known-value list is returned so the error message can at least
/// enumerate what is accepted.
fn suggest_values(input: &str, known: &[String]) -> Vec<String> {
    if known.is_empty() {
        return Vec::new();
    }

    let near: Vec<String> = known
        .iter()
        .filter(|k| k.starts_with(input) || input.starts_with(k.as_str()) || k.contains(input))
        .take(MAX_SUGGESTIONS)
        .cloned()
        .collect();
    if !near.is_empty() {
        return near;
    }

    known.to_vec()
}
