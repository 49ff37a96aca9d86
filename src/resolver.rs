//! Deterministic template and schema file resolution.
//!
//! Given a validated classification and a configured base directory, a
//! resolver computes an ordered list of candidate locations and picks the
//! first readable one. The order is fixed, most specific first:
//!
//! 1. `{base}/{directive}/{layer}/f_{layer}_{adaptation}.{ext}` (only when
//!    an adaptation qualifier was supplied)
//! 2. `{base}/{directive}/{layer}/f_{layer}.{ext}`
//! 3. `{base}/{directive}/{layer}.{ext}` (flat fallback)
//!
//! When nothing exists, the error carries the complete candidate list and
//! the effective base directory, so a user can tell a misconfigured base
//! directory apart from a genuinely missing file.
//!
//! An empty base directory is a hard configuration error. Resolution never
//! substitutes the current working directory for a missing base: that
//! fallback used to produce "not found" reports for files sitting exactly
//! where the configuration pointed, with only the process cwd differing.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, trace};

use crate::classify::{Directive, Layer};

/// Which kind of file a resolver locates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolverKind {
    Template,
    Schema,
}

impl ResolverKind {
    /// File extension used for this kind's candidates.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Template => "md",
            Self::Schema => "json",
        }
    }
}

impl std::fmt::Display for ResolverKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Template => write!(f, "template"),
            Self::Schema => write!(f, "schema"),
        }
    }
}

/// Resolution failure.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The configured base directory is empty. Deliberately fatal; never
    /// replaced by a process-relative default.
    #[error("{kind} base directory is not configured")]
    MissingBaseDirectory { kind: ResolverKind },

    /// No candidate exists. Carries every location that was tried.
    #[error("no {kind} found for {directive}/{layer} under {}", .base_dir.display())]
    NotFound {
        kind: ResolverKind,
        directive: String,
        layer: String,
        base_dir: PathBuf,
        candidates: Vec<PathBuf>,
    },
}

/// Locates template or schema files for a classification.
///
/// Construction binds the kind and base directory; [`resolve`] is then a
/// pure function of the classification plus the filesystem state.
///
/// [`resolve`]: PathResolver::resolve
#[derive(Debug, Clone)]
pub struct PathResolver {
    kind: ResolverKind,
    base_dir: PathBuf,
}

impl PathResolver {
    /// Creates a template resolver rooted at `base_dir`.
    pub fn template(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: ResolverKind::Template,
            base_dir: base_dir.into(),
        }
    }

    /// Creates a schema resolver rooted at `base_dir`.
    pub fn schema(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            kind: ResolverKind::Schema,
            base_dir: base_dir.into(),
        }
    }

    /// Computes the ordered candidate list without touching the filesystem.
    pub fn candidates(
        &self,
        directive: &Directive,
        layer: &Layer,
        adaptation: Option<&str>,
    ) -> Vec<PathBuf> {
        let ext = self.kind.extension();
        let dir = self.base_dir.join(directive.as_str());
        let mut candidates = Vec::with_capacity(3);

        if let Some(adaptation) = adaptation {
            candidates.push(
                dir.join(layer.as_str()).join(format!("f_{}_{}.{ext}", layer.as_str(), adaptation)),
            );
        }
        candidates.push(dir.join(layer.as_str()).join(format!("f_{}.{ext}", layer.as_str())));
        candidates.push(dir.join(format!("{}.{ext}", layer.as_str())));

        candidates
    }

    /// Returns the most specific existing candidate.
    ///
    /// Candidates are tested in order and the first readable regular file
    /// wins; the result is deterministic for a fixed file set.
    ///
    /// # Errors
    ///
    /// - [`ResolveError::MissingBaseDirectory`] when the base directory is
    ///   empty (configuration error, checked before any filesystem access)
    /// - [`ResolveError::NotFound`] when no candidate exists, carrying the
    ///   full ordered candidate list and the effective base directory
    pub fn resolve(
        &self,
        directive: &Directive,
        layer: &Layer,
        adaptation: Option<&str>,
    ) -> Result<PathBuf, ResolveError> {
        if self.base_dir.as_os_str().is_empty() {
            return Err(ResolveError::MissingBaseDirectory { kind: self.kind });
        }

        let candidates = self.candidates(directive, layer, adaptation);
        for candidate in &candidates {
            trace!("Checking {} candidate: {}", self.kind, candidate.display());
            if !candidate.is_file() {
                continue;
            }
            // The winner must be openable now; an unreadable file falls
            // through to the next candidate instead of failing later at
            // the read.
            if fs::File::open(candidate).is_err() {
                debug!("Skipping unreadable {} candidate: {}", self.kind, candidate.display());
                continue;
            }
            debug!("Resolved {} for {}/{}: {}", self.kind, directive, layer, candidate.display());
            return Ok(candidate.clone());
        }

        debug!(
            "No {} found for {}/{} after trying {} candidates",
            self.kind,
            directive,
            layer,
            candidates.len()
        );
        Err(ResolveError::NotFound {
            kind: self.kind,
            directive: directive.as_str().to_string(),
            layer: layer.as_str().to_string(),
            base_dir: self.base_dir.clone(),
            candidates,
        })
    }

    /// The base directory this resolver searches under.
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClassificationFactory;
    use crate::pattern::PatternSet;
    use std::fs;
    use tempfile::TempDir;

    fn classification() -> (Directive, Layer) {
        let patterns = PatternSet::from_sources("^(to|summary)$", "^(project|issue)$");
        let factory = ClassificationFactory::new(&patterns);
        let c = factory.create("to", "project").unwrap();
        (c.directive, c.layer)
    }

    #[test]
    fn test_candidate_order_without_adaptation() {
        let (directive, layer) = classification();
        let resolver = PathResolver::template("/tmp/prompts");

        let candidates = resolver.candidates(&directive, &layer, None);
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/tmp/prompts/to/project/f_project.md"),
                PathBuf::from("/tmp/prompts/to/project.md"),
            ]
        );
    }

    #[test]
    fn test_candidate_order_with_adaptation() {
        let (directive, layer) = classification();
        let resolver = PathResolver::template("/tmp/prompts");

        let candidates = resolver.candidates(&directive, &layer, Some("strict"));
        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/tmp/prompts/to/project/f_project_strict.md"),
                PathBuf::from("/tmp/prompts/to/project/f_project.md"),
                PathBuf::from("/tmp/prompts/to/project.md"),
            ]
        );
    }

    #[test]
    fn test_flat_fallback_wins_when_only_it_exists() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("to")).unwrap();
        fs::write(temp.path().join("to/project.md"), "flat").unwrap();

        let resolver = PathResolver::template(temp.path());
        let resolved = resolver.resolve(&directive, &layer, None).unwrap();
        assert_eq!(resolved, temp.path().join("to/project.md"));
    }

    #[test]
    fn test_layer_qualified_beats_flat_fallback() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("to/project")).unwrap();
        fs::write(temp.path().join("to/project.md"), "flat").unwrap();
        fs::write(temp.path().join("to/project/f_project.md"), "qualified").unwrap();

        let resolver = PathResolver::template(temp.path());
        let resolved = resolver.resolve(&directive, &layer, None).unwrap();
        assert_eq!(resolved, temp.path().join("to/project/f_project.md"));
    }

    #[test]
    fn test_adaptation_qualified_is_most_specific() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("to/project")).unwrap();
        fs::write(temp.path().join("to/project/f_project.md"), "qualified").unwrap();
        fs::write(temp.path().join("to/project/f_project_strict.md"), "adapted").unwrap();

        let resolver = PathResolver::template(temp.path());
        let resolved = resolver.resolve(&directive, &layer, Some("strict")).unwrap();
        assert_eq!(resolved, temp.path().join("to/project/f_project_strict.md"));

        // Without the qualifier, the adapted file is not a candidate.
        let resolved = resolver.resolve(&directive, &layer, None).unwrap();
        assert_eq!(resolved, temp.path().join("to/project/f_project.md"));
    }

    #[test]
    fn test_not_found_carries_all_candidates_and_base_dir() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();

        let resolver = PathResolver::schema(temp.path());
        let err = resolver.resolve(&directive, &layer, Some("x")).unwrap_err();
        match err {
            ResolveError::NotFound {
                kind,
                candidates,
                base_dir,
                ..
            } => {
                assert_eq!(kind, ResolverKind::Schema);
                assert_eq!(base_dir, temp.path());
                assert_eq!(candidates.len(), 3);
                assert!(candidates[0].ends_with("to/project/f_project_x.json"));
                assert!(candidates[2].ends_with("to/project.json"));
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_base_dir_is_hard_error() {
        let (directive, layer) = classification();

        let resolver = PathResolver::template("");
        let err = resolver.resolve(&directive, &layer, None).unwrap_err();
        assert!(matches!(
            err,
            ResolveError::MissingBaseDirectory {
                kind: ResolverKind::Template
            }
        ));

        // Even when a matching file exists relative to the cwd.
        let resolver = PathResolver::schema("");
        assert!(resolver.resolve(&directive, &layer, None).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_unreadable_candidate_falls_through_to_next() {
        use std::os::unix::fs::PermissionsExt;

        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("to/project")).unwrap();
        let qualified = temp.path().join("to/project/f_project.md");
        fs::write(&qualified, "qualified").unwrap();
        fs::write(temp.path().join("to/project.md"), "flat").unwrap();
        fs::set_permissions(&qualified, fs::Permissions::from_mode(0o000)).unwrap();

        // Privileged processes can open mode-000 files; the selection
        // rule is only observable when the open actually fails.
        if fs::File::open(&qualified).is_err() {
            let resolver = PathResolver::template(temp.path());
            let resolved = resolver.resolve(&directive, &layer, None).unwrap();
            assert_eq!(resolved, temp.path().join("to/project.md"));
        }

        fs::set_permissions(&qualified, fs::Permissions::from_mode(0o644)).unwrap();
    }

    #[test]
    fn test_directory_with_candidate_name_is_not_a_match() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        // A directory named like the flat candidate must be skipped.
        fs::create_dir_all(temp.path().join("to/project.md")).unwrap();

        let resolver = PathResolver::template(temp.path());
        assert!(matches!(
            resolver.resolve(&directive, &layer, None),
            Err(ResolveError::NotFound { .. })
        ));
    }

    #[test]
    fn test_schema_resolver_uses_json_extension() {
        let (directive, layer) = classification();
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("to")).unwrap();
        fs::write(temp.path().join("to/project.json"), "{}").unwrap();

        let resolver = PathResolver::schema(temp.path());
        let resolved = resolver.resolve(&directive, &layer, None).unwrap();
        assert_eq!(resolved, temp.path().join("to/project.json"));
    }
}
