//! Classification pattern compilation for promptforge.
//!
//! Directive and layer tokens are validated against regular expressions that
//! come from merged configuration, not from a hardcoded list. This module
//! owns the compiled form of those expressions and the best-effort metadata
//! derived from them.
//!
//! # Pattern Sources
//!
//! A pattern source is a plain regex string, typically an anchored
//! alternation:
//!
//! ```toml
//! directive_pattern = "^(to|summary|defect)$"
//! layer_pattern = "^(project|issue|task)$"
//! ```
//!
//! Any valid regex is accepted; the alternation form is only special in that
//! it lets us enumerate the known values for suggestion messages.
//!
//! # Failure Semantics
//!
//! A malformed pattern source never panics and never produces a partially
//! compiled pattern. [`ClassPattern::compile`] returns `None`, and callers
//! must treat the absence as a configuration error, distinct from a
//! user-input error. Known-value extraction is likewise best-effort: an
//! unparsable enumeration only degrades suggestion quality, it never affects
//! validation itself.

use regex::Regex;
use tracing::{debug, warn};

/// A compiled classification rule plus the source it was compiled from.
///
/// One `ClassPattern` exists per classification axis (directive, layer).
/// The original source string is retained for diagnostics and for deriving
/// known-value lists.
#[derive(Debug, Clone)]
pub struct ClassPattern {
    regex: Regex,
    source: String,
}

impl ClassPattern {
    /// Compiles a pattern source into a usable matcher.
    ///
    /// Returns `None` when the source is not a valid regular expression.
    /// The failure is logged but never raised; an absent pattern signals a
    /// configuration problem that the classification factory reports as
    /// such.
    pub fn compile(source: &str) -> Option<Self> {
        match Regex::new(source) {
            Ok(regex) => Some(Self {
                regex,
                source: source.to_string(),
            }),
            Err(e) => {
                warn!("Malformed classification pattern '{}': {}", source, e);
                None
            }
        }
    }

    /// Tests a candidate string against the compiled rule.
    ///
    /// Matching is exactly what the configured regex says it is: no
    /// trimming, no case folding.
    pub fn matches(&self, candidate: &str) -> bool {
        self.regex.is_match(candidate)
    }

    /// Returns the original pattern source string.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Extracts the enumerated values from an anchored alternation source.
    ///
    /// Recognizes the `^(a|b|c)$` shape where every alternative is a plain
    /// word (letters, digits, `_`, `-`). Anything else yields an empty list,
    /// which downstream code treats as "no known values" and falls back to
    /// generic error messages.
    pub fn enumerated_values(&self) -> Vec<String> {
        let trimmed = self.source.strip_prefix('^').unwrap_or(&self.source);
        let trimmed = trimmed.strip_suffix('$').unwrap_or(trimmed);

        let Some(inner) = trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) else {
            debug!("Pattern '{}' is not enumerable, no known values derived", self.source);
            return Vec::new();
        };

        let values: Vec<String> = inner.split('|').map(str::to_string).collect();
        let all_literal = values.iter().all(|v| {
            !v.is_empty() && v.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });

        if all_literal {
            values
        } else {
            debug!(
                "Pattern '{}' contains non-literal alternatives, skipping enumeration",
                self.source
            );
            Vec::new()
        }
    }
}

/// Provider of the two classification patterns and their derived metadata.
///
/// Built once from merged configuration and shared by the classification
/// factory. Either pattern may be absent when its configured source was
/// malformed; the known-value lists are empty whenever the corresponding
/// pattern is absent or not enumerable.
#[derive(Debug, Clone)]
pub struct PatternSet {
    directive: Option<ClassPattern>,
    layer: Option<ClassPattern>,
    known_directives: Vec<String>,
    known_layers: Vec<String>,
}

impl PatternSet {
    /// Builds a pattern set from the two configured sources.
    ///
    /// Compilation failures are captured as absent patterns rather than
    /// errors so that a single call site (the factory) decides how to
    /// surface them.
    pub fn from_sources(directive_source: &str, layer_source: &str) -> Self {
        let directive = ClassPattern::compile(directive_source);
        let layer = ClassPattern::compile(layer_source);
        let known_directives =
            directive.as_ref().map(ClassPattern::enumerated_values).unwrap_or_default();
        let known_layers =
            layer.as_ref().map(ClassPattern::enumerated_values).unwrap_or_default();

        Self {
            directive,
            layer,
            known_directives,
            known_layers,
        }
    }

    /// The compiled directive pattern, or `None` when its source was malformed.
    pub fn directive_pattern(&self) -> Option<&ClassPattern> {
        self.directive.as_ref()
    }

    /// The compiled layer pattern, or `None` when its source was malformed.
    pub fn layer_pattern(&self) -> Option<&ClassPattern> {
        self.layer.as_ref()
    }

    /// Known directive values, in pattern order. Empty when not derivable.
    pub fn known_directives(&self) -> &[String] {
        &self.known_directives
    }

    /// Known layer values, in pattern order. Empty when not derivable.
    pub fn known_layers(&self) -> &[String] {
        &self.known_layers
    }
}
