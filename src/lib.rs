//! promptforge - deterministic prompt template resolution and rendering.
//!
//! promptforge turns a two-part classification plus raw inputs into a
//! rendered instructional document. A job is classified by a *directive*
//! (the kind of transformation requested) and a *layer* (the granularity
//! it targets); both are validated against configurable patterns. The
//! classification then drives deterministic resolution of template and
//! schema file locations, and a three-stage pipeline converts raw inputs
//! (file paths, piped content, user key/value pairs) into a validated,
//! duplicate-free variable set for substitution.
//!
//! # Pipeline
//!
//! ```text
//! args/config -> ClassificationFactory -> PathResolver -> collector/build -> params -> render
//! ```
//!
//! - [`pattern`] - compiled classification patterns from configuration
//! - [`classify`] - validated `Directive`/`Layer` values and their factory
//! - [`resolver`] - ordered-candidate template and schema resolution
//! - [`variables`] - the variable union and the accumulating collector
//! - [`transform`] - stage 1→2 and stage 2→3 of the variable pipeline
//! - [`render`] - `{name}` placeholder substitution
//! - [`config`] - TOML settings loading
//! - [`core`] - aggregated error taxonomy and presentation helpers
//! - [`cli`] - the `promptforge` command-line interface
//!
//! # Design Invariants
//!
//! - Classification values are immutable and constructed only by the
//!   factory; whatever reaches a resolver already matched its pattern.
//! - Candidate paths are tried most specific first, and a resolution
//!   failure always reports every location that was tried.
//! - An empty base directory is a configuration error; it is never
//!   replaced by a process-relative default.
//! - Validation failures accumulate; a job fails atomically with the full
//!   error list rather than stopping at the first problem.
//!
//! # Example
//!
//! ```rust,no_run
//! use promptforge::classify::ClassificationFactory;
//! use promptforge::pattern::PatternSet;
//! use promptforge::resolver::PathResolver;
//! use promptforge::transform::{SourceRecord, source_to_variables, variables_to_params};
//!
//! # fn main() -> anyhow::Result<()> {
//! let patterns = PatternSet::from_sources("^(to|summary)$", "^(project|issue)$");
//! let factory = ClassificationFactory::new(&patterns);
//! let c = factory.create("to", "project")?;
//!
//! let template = PathResolver::template("/srv/prompts")
//!     .resolve(&c.directive, &c.layer, None)?;
//!
//! let mut record = SourceRecord::new(c.directive, c.layer);
//! record.stdin = Some("piped content".to_string());
//! let variables = source_to_variables(&record)
//!     .map_err(|errs| anyhow::anyhow!("{} variable error(s)", errs.len()))?;
//! let params = variables_to_params(&variables, template)?;
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod pattern;
pub mod render;
pub mod resolver;
pub mod transform;
pub mod variables;
