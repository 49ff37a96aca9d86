//! Template variables and their collection.
//!
//! A [`Variable`] is one named, typed unit of substitution data destined
//! for the renderer. Variables come from four channels:
//!
//! - **Standard**: a value bound to one of the fixed standard names
//! - **FilePath**: as standard, but the value is semantically a path
//! - **Stdin**: piped content, bound to the fixed name `input_text`
//! - **User**: caller-supplied pairs whose names carry the `uv-` prefix
//!
//! Variables are gathered per job by [`VariableCollector`], which validates
//! each contribution as it arrives but defers duplicate detection and the
//! final verdict to [`VariableCollector::build`].

mod collector;

pub use collector::VariableCollector;

use thiserror::Error;

/// The closed set of standard variable names.
///
/// `add_standard` and `add_file_path` reject anything outside this list;
/// the set changes only with the template contract itself.
pub const STANDARD_VARIABLE_NAMES: &[&str] =
    &["input_text_file", "input_text", "destination_path", "schema_file"];

/// Prefix required on every user-supplied variable name.
pub const USER_VARIABLE_PREFIX: &str = "uv-";

/// Fixed name under which piped stdin content is exposed to templates.
pub const STDIN_VARIABLE_NAME: &str = "input_text";

/// One named, typed unit of substitution data. Immutable once added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variable {
    /// A value bound to a standard name.
    Standard { name: String, value: String },
    /// A filesystem path bound to a standard name. Existence is not
    /// re-checked here; path resolution happens upstream.
    FilePath { name: String, value: String },
    /// Piped input content, always named [`STDIN_VARIABLE_NAME`].
    Stdin { content: String },
    /// A caller-supplied pair with the [`USER_VARIABLE_PREFIX`] prefix.
    User { name: String, value: String },
}

impl Variable {
    /// The name this variable binds in the template.
    pub fn name(&self) -> &str {
        match self {
            Self::Standard { name, .. } | Self::FilePath { name, .. } | Self::User { name, .. } => {
                name
            }
            Self::Stdin { .. } => STDIN_VARIABLE_NAME,
        }
    }

    /// The substitution value.
    pub fn value(&self) -> &str {
        match self {
            Self::Standard { value, .. }
            | Self::FilePath { value, .. }
            | Self::User { value, .. } => value,
            Self::Stdin { content } => content,
        }
    }
}

/// A validation failure recorded by the collector.
///
/// Duplicates are deliberately a separate kind from invalid names: fixing
/// one means renaming, fixing the other means de-duplicating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollectorError {
    /// The name is outside the standard-name set.
    #[error("invalid variable name '{name}'")]
    InvalidName { name: String },

    /// A user variable name without the required prefix.
    #[error("user variable name '{name}' lacks the '{USER_VARIABLE_PREFIX}' prefix")]
    MissingUserPrefix { name: String },

    /// An empty value where emptiness is not permitted.
    #[error("empty value for variable '{name}'")]
    EmptyValue { name: String },

    /// Two collected variables share a name.
    #[error("duplicate variable name '{name}'")]
    Duplicate { name: String },

    /// Nothing was collected and the job does not permit an empty set.
    #[error("no variables were collected")]
    EmptyVariableSet,
}
