//! Placeholder substitution for resolved templates.
//!
//! Templates use flat `{name}` placeholders; the renderer replaces every
//! placeholder whose name appears in the job's [`TemplateParams`] and
//! leaves unknown placeholders untouched. Unknowns are logged at debug
//! level together with near-miss suggestions so typos in templates are
//! easy to chase down without making rendering fail.

use std::collections::BTreeMap;

use regex::{Captures, Regex};
use strsim::levenshtein;
use tracing::debug;

use crate::transform::TemplateParams;

/// Placeholder shape: `{input_text}`, `{uv-author}`, ...
const PLACEHOLDER_PATTERN: &str = r"\{([A-Za-z][A-Za-z0-9_-]*)\}";

/// Maximum Levenshtein distance, as a percentage of the longer name, for a
/// variable to be suggested for an unresolved placeholder.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Substitutes [`TemplateParams`] variables into template text.
#[derive(Debug, Clone)]
pub struct Renderer {
    placeholder: Regex,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            placeholder: Regex::new(PLACEHOLDER_PATTERN).unwrap(),
        }
    }

    /// Renders a template body against the job's parameters.
    ///
    /// Every `{name}` whose name is bound in `params.variables` is replaced
    /// with its value; everything else passes through unchanged, including
    /// unknown placeholders.
    pub fn render(&self, template: &str, params: &TemplateParams) -> String {
        self.placeholder
            .replace_all(template, |caps: &Captures<'_>| {
                let name = &caps[1];
                match params.variables.get(name) {
                    Some(value) => value.clone(),
                    None => {
                        let suggestions = similar_names(name, &params.variables);
                        if suggestions.is_empty() {
                            debug!("Unresolved placeholder '{{{name}}}', leaving as-is");
                        } else {
                            debug!(
                                "Unresolved placeholder '{{{name}}}', did you mean {}?",
                                suggestions.join(", ")
                            );
                        }
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Finds bound variable names close to an unresolved placeholder name.
fn similar_names(target: &str, variables: &BTreeMap<String, String>) -> Vec<String> {
    let mut scored: Vec<(String, usize)> =
        variables.keys().map(|name| (name.clone(), levenshtein(target, name))).collect();
    scored.sort_by_key(|(_, dist)| *dist);

    scored
        .into_iter()
        .filter(|(name, dist)| {
            *dist * 100 <= name.len().max(target.len()) * SIMILARITY_THRESHOLD_PERCENT
        })
        .take(3)
        .map(|(name, _)| name)
        .collect()
}
