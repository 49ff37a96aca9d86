//! Chainable, failure-accumulating variable collector.
//!
//! The collector is a two-list accumulator: contributions that pass
//! per-call validation land in the success list, failures land in the
//! error list, and every `add_*` call returns the collector itself so call
//! sites can chain regardless of per-call outcome. Nothing is thrown;
//! [`VariableCollector::build`] is the single point where the job either
//! gets its complete variable list or the complete error list.
//!
//! Duplicate names are only detectable once all contributions are in, so
//! the duplicate scan happens at build time and its findings are merged
//! with the per-call errors.
//!
//! # Examples
//!
//! ```rust
//! use promptforge::variables::VariableCollector;
//!
//! let mut collector = VariableCollector::new();
//! collector
//!     .add_standard("input_text_file", "in.md")
//!     .add_user("uv-author", "Jane")
//!     .add_stdin("hello");
//!
//! let variables = collector.build().unwrap();
//! assert_eq!(variables.len(), 3);
//!
//! let record = collector.to_record();
//! assert_eq!(record["input_text"], "hello");
//! ```

use std::collections::{BTreeMap, HashSet};

use tracing::trace;

use super::{
    CollectorError, STANDARD_VARIABLE_NAMES, STDIN_VARIABLE_NAME, USER_VARIABLE_PREFIX, Variable,
};

/// Accumulates the variable set for one processing job.
///
/// Create one per job, feed it through the `add_*` methods, then call
/// [`build`](Self::build) exactly once. [`clear`](Self::clear) resets the
/// collector for reuse between independent jobs.
#[derive(Debug, Default)]
pub struct VariableCollector {
    variables: Vec<Variable>,
    errors: Vec<CollectorError>,
    permit_empty: bool,
}

impl VariableCollector {
    /// Creates an empty collector that rejects an empty final set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allows [`build`](Self::build) to succeed with zero variables.
    #[must_use]
    pub fn permit_empty(mut self) -> Self {
        self.permit_empty = true;
        self
    }

    /// Adds a value under a standard name.
    ///
    /// Records an error when the name is outside
    /// [`STANDARD_VARIABLE_NAMES`] or the value is empty.
    pub fn add_standard(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some(err) = validate_standard(name, value) {
            self.errors.push(err);
        } else {
            self.variables.push(Variable::Standard {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    /// Adds a path value under a standard name.
    ///
    /// Validation matches [`add_standard`](Self::add_standard); the variant
    /// only tags the value as a path. Existence is not re-checked here,
    /// resolution already happened upstream.
    pub fn add_file_path(&mut self, name: &str, value: &str) -> &mut Self {
        if let Some(err) = validate_standard(name, value) {
            self.errors.push(err);
        } else {
            self.variables.push(Variable::FilePath {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    /// Adds piped input content under the fixed stdin name.
    ///
    /// The stdin channel is conceptually singular: a second call produces
    /// two variables with the same name and therefore a duplicate error at
    /// build time.
    pub fn add_stdin(&mut self, content: &str) -> &mut Self {
        if content.is_empty() {
            self.errors.push(CollectorError::EmptyValue {
                name: STDIN_VARIABLE_NAME.to_string(),
            });
        } else {
            self.variables.push(Variable::Stdin {
                content: content.to_string(),
            });
        }
        self
    }

    /// Adds a user-supplied pair.
    ///
    /// The naming policy lives here, not in [`Variable`]: user names must
    /// carry the [`USER_VARIABLE_PREFIX`] prefix and values must be
    /// non-empty.
    pub fn add_user(&mut self, name: &str, value: &str) -> &mut Self {
        if !name.starts_with(USER_VARIABLE_PREFIX) || name.len() == USER_VARIABLE_PREFIX.len() {
            self.errors.push(CollectorError::MissingUserPrefix {
                name: name.to_string(),
            });
        } else if value.is_empty() {
            self.errors.push(CollectorError::EmptyValue {
                name: name.to_string(),
            });
        } else {
            self.variables.push(Variable::User {
                name: name.to_string(),
                value: value.to_string(),
            });
        }
        self
    }

    /// Finalizes the set.
    ///
    /// Scans the successes for exact-match name collisions, merges those
    /// findings with the per-call errors, and succeeds only when the merged
    /// error list is empty and the set is non-empty (unless emptiness was
    /// permitted via [`permit_empty`](Self::permit_empty)).
    ///
    /// The returned list preserves insertion order.
    pub fn build(&self) -> Result<Vec<Variable>, Vec<CollectorError>> {
        let mut errors = self.errors.clone();

        let mut seen: HashSet<&str> = HashSet::new();
        let mut reported: HashSet<&str> = HashSet::new();
        for variable in &self.variables {
            let name = variable.name();
            if !seen.insert(name) && reported.insert(name) {
                errors.push(CollectorError::Duplicate {
                    name: name.to_string(),
                });
            }
        }

        if self.variables.is_empty() && !self.permit_empty && errors.is_empty() {
            errors.push(CollectorError::EmptyVariableSet);
        }

        if errors.is_empty() {
            trace!("Collected {} variables", self.variables.len());
            Ok(self.variables.clone())
        } else {
            Err(errors)
        }
    }

    /// Flattens the current successes into a name/value map.
    ///
    /// Diagnostic convenience only: it bypasses error checking and, under
    /// a name collision, later entries win. Use [`build`](Self::build) for
    /// the validated result.
    pub fn to_record(&self) -> BTreeMap<String, String> {
        self.variables
            .iter()
            .map(|v| (v.name().to_string(), v.value().to_string()))
            .collect()
    }

    /// Resets the collector to its initial state for the next job.
    pub fn clear(&mut self) {
        self.variables.clear();
        self.errors.clear();
    }

    /// Number of successfully collected variables so far.
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// Whether nothing has been successfully collected yet.
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

fn validate_standard(name: &str, value: &str) -> Option<CollectorError> {
    if !STANDARD_VARIABLE_NAMES.contains(&name) {
        return Some(CollectorError::InvalidName {
            name: name.to_string(),
        });
    }
    if value.is_empty() {
        return Some(CollectorError::EmptyValue {
            name: name.to_string(),
        });
    }
    None
}
