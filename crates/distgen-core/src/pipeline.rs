//! Generation pipeline: render every target, then gate the writes.
//!
//! Targets are processed sequentially in declaration order and the run is
//! fail-fast: the first error aborts before any later target is touched, so
//! a broken schema never leaves the tree partially regenerated.

use std::path::{Path, PathBuf};

use crate::commit::{self, Outcome};
use crate::emit;
use crate::error::{GenError, MarkerError};
use crate::markers;
use crate::schema::{Registry, TargetKind, TargetSpec};

/// Banner line heading fully generated files.
const GENERATED_BANNER: &str = "/* DO NOT EDIT: automatically built by distgen. */\n";

/// Per-target outcomes of a completed run.
#[derive(Debug)]
pub struct RunReport {
    pub targets: Vec<TargetOutcome>,
}

#[derive(Debug)]
pub struct TargetOutcome {
    /// Target path relative to the generation root.
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Regenerate every target under `root`.
pub fn run(registry: &Registry, root: &Path) -> Result<RunReport, GenError> {
    let mut targets = Vec::with_capacity(registry.targets.len());
    for target in &registry.targets {
        let (path, candidate) = render_target(registry, root, target)?;
        let outcome = commit::commit(&path, &candidate)?;
        tracing::info!(
            path = %target.path.display(),
            outcome = outcome.as_str(),
            "target processed"
        );
        targets.push(TargetOutcome {
            path: target.path.clone(),
            outcome,
        });
    }
    Ok(RunReport { targets })
}

/// Render every target without writing; `Replaced` marks drift.
pub fn check(registry: &Registry, root: &Path) -> Result<RunReport, GenError> {
    let mut targets = Vec::with_capacity(registry.targets.len());
    for target in &registry.targets {
        let (path, candidate) = render_target(registry, root, target)?;
        let outcome = if commit::would_change(&path, &candidate)? {
            Outcome::Replaced
        } else {
            Outcome::Unchanged
        };
        targets.push(TargetOutcome {
            path: target.path.clone(),
            outcome,
        });
    }
    Ok(RunReport { targets })
}

/// Produce the candidate content for one target.
fn render_target(
    registry: &Registry,
    root: &Path,
    target: &TargetSpec,
) -> Result<(PathBuf, String), GenError> {
    let path = root.join(&target.path);
    match &target.kind {
        TargetKind::Regions(regions) => {
            let mut text = match std::fs::read_to_string(&path) {
                Ok(t) => t,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    return Err(MarkerError::MissingTarget { path }.into())
                }
                Err(e) => return Err(GenError::Io { path, source: e }),
            };
            // Regions are independent; each is reconstructed from the schema
            // in declaration order against the evolving text.
            for region in regions {
                let rendered = emit::render_section(registry, &region.section)?;
                let split = markers::split(&text, &region.begin, &region.end, &path)?;
                let next = format!("{}\n{}{}", split.prefix, rendered, split.suffix);
                text = next;
            }
            Ok((path, text))
        }
        TargetKind::Whole(sections) => {
            let mut out = String::from(GENERATED_BANNER);
            for section in sections {
                out.push('\n');
                out.push_str(&emit::render_section(registry, section)?);
            }
            Ok((path, out))
        }
    }
}
