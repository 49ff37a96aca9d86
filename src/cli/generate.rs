//! The `generate` command: the full pipeline from raw tokens to rendered
//! document.
//!
//! Control flow matches the library's stage ordering: settings →
//! classification → path resolution → variable collection → parameter
//! flattening → rendering. Each structured failure is wrapped into
//! [`ForgeError`] so `main` can present it with details and suggestions.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use tracing::{debug, info};

use crate::classify::ClassificationFactory;
use crate::config::Settings;
use crate::core::ForgeError;
use crate::pattern::PatternSet;
use crate::render::Renderer;
use crate::resolver::{PathResolver, ResolveError};
use crate::transform::{SourceRecord, source_to_variables, variables_to_params};

/// Arguments for `promptforge generate`.
#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Directive token (e.g. "to", "summary", "defect").
    directive: String,

    /// Layer token (e.g. "project", "issue", "task").
    layer: String,

    /// Input file path, or "-" to read piped stdin.
    #[arg(short = 'f', long = "from", value_name = "FILE")]
    from: Option<String>,

    /// Write the rendered document here instead of stdout.
    #[arg(short = 'o', long = "destination", value_name = "FILE")]
    destination: Option<PathBuf>,

    /// Adaptation qualifier selecting a template variant.
    #[arg(short = 'a', long, value_name = "NAME")]
    adaptation: Option<String>,

    /// User variable as NAME=VALUE; names must start with "uv-". Repeatable.
    #[arg(long = "uv", value_name = "NAME=VALUE", value_parser = parse_user_variable)]
    user_variables: Vec<(String, String)>,

    /// Override the configured prompt template base directory.
    #[arg(long, value_name = "DIR")]
    prompt_dir: Option<PathBuf>,

    /// Override the configured schema base directory.
    #[arg(long, value_name = "DIR")]
    schema_dir: Option<PathBuf>,
}

impl GenerateCommand {
    pub fn execute(self, config_path: Option<&Path>) -> Result<()> {
        let settings = Settings::load(config_path)?;
        self.execute_with_settings(&settings)
    }

    /// Runs the pipeline against already-loaded settings. Split out so
    /// tests can inject configuration without touching the filesystem
    /// lookup order.
    pub fn execute_with_settings(self, settings: &Settings) -> Result<()> {
        let patterns =
            PatternSet::from_sources(&settings.directive_pattern, &settings.layer_pattern);
        let factory = ClassificationFactory::new(&patterns);
        let classification =
            factory.create(&self.directive, &self.layer).map_err(ForgeError::from)?;

        let prompt_dir = self.prompt_dir.clone().unwrap_or_else(|| settings.prompt_base_dir());
        let template_path = PathResolver::template(prompt_dir)
            .resolve(&classification.directive, &classification.layer, self.adaptation.as_deref())
            .map_err(ForgeError::from)?;

        // A missing schema file only omits the schema_file variable; a
        // missing schema base directory is still a configuration error.
        let schema_dir = self.schema_dir.clone().unwrap_or_else(|| settings.schema_base_dir());
        let schema_path = match PathResolver::schema(schema_dir).resolve(
            &classification.directive,
            &classification.layer,
            self.adaptation.as_deref(),
        ) {
            Ok(path) => Some(path),
            Err(ResolveError::NotFound { .. }) => {
                debug!(
                    "No schema for {}/{}, continuing without one",
                    classification.directive, classification.layer
                );
                None
            }
            Err(err @ ResolveError::MissingBaseDirectory { .. }) => {
                return Err(ForgeError::from(err).into());
            }
        };

        let stdin_content = if self.from.as_deref() == Some("-") {
            Some(read_stdin()?)
        } else {
            None
        };

        let mut record =
            SourceRecord::new(classification.directive.clone(), classification.layer.clone());
        record.input_file = self.from.clone().filter(|f| f != "-");
        record.destination = self.destination.as_ref().map(|p| p.display().to_string());
        record.schema_file = schema_path.map(|p| p.display().to_string());
        record.stdin = stdin_content;
        record.user_variables =
            self.user_variables.iter().cloned().collect::<BTreeMap<String, String>>();
        record.permit_empty = true;

        let variables = source_to_variables(&record).map_err(ForgeError::from)?;
        let params =
            variables_to_params(&variables, &template_path).map_err(ForgeError::from)?;

        let template = std::fs::read_to_string(&params.template_path).with_context(|| {
            format!("Failed to read template: {}", params.template_path.display())
        })?;
        let rendered = Renderer::new().render(&template, &params);

        match &self.destination {
            Some(dest) => {
                std::fs::write(dest, rendered)
                    .with_context(|| format!("Failed to write output: {}", dest.display()))?;
                info!("Wrote rendered document to {}", dest.display());
            }
            None => print!("{rendered}"),
        }

        Ok(())
    }
}

/// Parses a `NAME=VALUE` user variable argument.
fn parse_user_variable(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.is_empty() => Ok((name.to_string(), value.to_string())),
        _ => Err(format!("expected NAME=VALUE, got '{raw}'")),
    }
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    std::io::stdin()
        .read_to_string(&mut content)
        .context("Failed to read piped input from stdin")?;
    if content.trim().is_empty() {
        bail!("No input received on stdin (expected piped content with --from -)");
    }
    Ok(content)
}
