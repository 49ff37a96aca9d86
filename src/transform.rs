//! The three-stage variable transformation pipeline.
//!
//! Stage 1→2 ([`source_to_variables`]) turns a raw [`SourceRecord`] into a
//! validated, duplicate-free variable list via the collector. Stage 2→3
//! ([`variables_to_params`]) flattens that list plus the resolved template
//! path into the [`TemplateParams`] record handed to the renderer.
//!
//! The stages are sequenced structurally: the only way to obtain a variable
//! list is a completed Stage 1→2, and the only way to obtain params is a
//! variable list plus a template path. No synchronization is involved; one
//! job owns its whole pipeline.

use std::collections::BTreeMap;
use std::path::PathBuf;

use thiserror::Error;
use tracing::debug;

use crate::classify::{Directive, Layer};
use crate::variables::{CollectorError, Variable, VariableCollector};

/// Standard name bound to the input file path.
const INPUT_FILE_VAR: &str = "input_text_file";
/// Standard name bound to the destination path.
const DESTINATION_VAR: &str = "destination_path";
/// Standard name bound to the resolved schema file path.
const SCHEMA_FILE_VAR: &str = "schema_file";

/// Raw per-job inputs as delivered by the argument and input layers.
///
/// Every optional field maps to exactly one collector channel; absent
/// fields are skipped entirely, never defaulted to an empty string. The
/// `stdin` field arrives already read and already empty-checked by the
/// caller-side input reader.
#[derive(Debug, Clone)]
pub struct SourceRecord {
    pub directive: Directive,
    pub layer: Layer,
    /// Path to the primary input file, if any.
    pub input_file: Option<String>,
    /// Path the rendered document should be written to, if any.
    pub destination: Option<String>,
    /// Resolved schema file path, if any.
    pub schema_file: Option<String>,
    /// Piped input content, if any.
    pub stdin: Option<String>,
    /// Open-ended user variables; names must carry the user prefix.
    pub user_variables: BTreeMap<String, String>,
    /// Whether a job with no variables at all is acceptable. Off by
    /// default; the CLI turns it on since a template may have no
    /// placeholders.
    pub permit_empty: bool,
}

impl SourceRecord {
    /// Creates a record with only the classification set.
    pub fn new(directive: Directive, layer: Layer) -> Self {
        Self {
            directive,
            layer,
            input_file: None,
            destination: None,
            schema_file: None,
            stdin: None,
            user_variables: BTreeMap::new(),
            permit_empty: false,
        }
    }
}

/// The flat record crossing into the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateParams {
    /// The resolved template file to render.
    pub template_path: PathBuf,
    /// Name/value substitution pairs; names are unique by construction.
    pub variables: BTreeMap<String, String>,
}

/// Stage 2→3 failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// The template path was empty or absent.
    #[error("template path is empty")]
    EmptyTemplatePath,
}

/// Stage 1→2: collects a source record into a validated variable list.
///
/// Each populated field is delegated to the matching collector channel, in
/// a fixed order (input file, destination, schema, stdin, then user
/// variables in name order). `build()` runs exactly once and its error
/// list, if any, is propagated verbatim; partial success never surfaces as
/// success.
pub fn source_to_variables(record: &SourceRecord) -> Result<Vec<Variable>, Vec<CollectorError>> {
    let mut collector = if record.permit_empty {
        VariableCollector::new().permit_empty()
    } else {
        VariableCollector::new()
    };

    if let Some(input_file) = &record.input_file {
        collector.add_file_path(INPUT_FILE_VAR, input_file);
    }
    if let Some(destination) = &record.destination {
        collector.add_file_path(DESTINATION_VAR, destination);
    }
    if let Some(schema_file) = &record.schema_file {
        collector.add_file_path(SCHEMA_FILE_VAR, schema_file);
    }
    if let Some(stdin) = &record.stdin {
        collector.add_stdin(stdin);
    }
    for (name, value) in &record.user_variables {
        collector.add_user(name, value);
    }

    let variables = collector.build()?;
    debug!(
        "Collected {} variables for {}/{}",
        variables.len(),
        record.directive,
        record.layer
    );
    Ok(variables)
}

/// Stage 2→3: pairs a built variable list with the resolved template path.
///
/// Uniqueness was already guaranteed by the collector, so flattening is
/// mechanical. The only failure mode is an empty template path.
pub fn variables_to_params(
    variables: &[Variable],
    template_path: impl Into<PathBuf>,
) -> Result<TemplateParams, ParamsError> {
    let template_path = template_path.into();
    if template_path.as_os_str().is_empty() {
        return Err(ParamsError::EmptyTemplatePath);
    }

    let variables = variables
        .iter()
        .map(|v| (v.name().to_string(), v.value().to_string()))
        .collect();

    Ok(TemplateParams {
        template_path,
        variables,
    })
}
