//! Release-branch bookkeeping: after a branch is cut in a workspace
//! repository, dependency entries in its `package.json` that reference a
//! sibling source repository are pinned to the new branch.
//!
//! The pin is guarded: an entry that already carries a `#branch` suffix was
//! chosen deliberately (manually or by an earlier run) and is left untouched
//! with a warning, so re-running the rewrite never clobbers an existing pin.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::warn;

use crate::errors::ReleaseError;
use crate::vcs::VcsRunner;

pub const PACKAGE_MANIFEST: &str = "package.json";

const DEP_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// Matches `[scheme:]owner/repo[#branch]` source-repository references
/// (npm's github shorthand). Plain versions, ranges, paths, and full URLs
/// do not match.
fn dep_ref_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(?:[a-z][a-z0-9+.-]*:)?[A-Za-z0-9][A-Za-z0-9-]*/[A-Za-z0-9_.][A-Za-z0-9_.-]*(?:#(?P<branch>.+))?$",
        )
        .expect("dependency reference pattern is valid")
    })
}

/// What happened to one dependency entry during a rewrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The entry was rewritten to carry the new branch suffix.
    Pinned { dependency: String, reference: String },
    /// The entry already carried a branch suffix and was left untouched.
    AlreadyPinned { dependency: String, existing: String },
}

impl RewriteOutcome {
    pub fn is_pinned(&self) -> bool {
        matches!(self, RewriteOutcome::Pinned { .. })
    }
}

/// Rewrite every source-repository dependency reference in `doc` to point at
/// `branch`, skipping entries that already pin one.
pub fn rewrite_dependency_refs(doc: &mut Value, branch: &str) -> Vec<RewriteOutcome> {
    let mut outcomes = Vec::new();
    let Some(root) = doc.as_object_mut() else {
        return outcomes;
    };

    for section in DEP_SECTIONS {
        let Some(Value::Object(deps)) = root.get_mut(section) else {
            continue;
        };
        for (dependency, value) in deps.iter_mut() {
            let Some(reference) = value.as_str() else {
                continue;
            };
            let Some(caps) = dep_ref_pattern().captures(reference) else {
                continue;
            };
            if let Some(existing) = caps.name("branch") {
                outcomes.push(RewriteOutcome::AlreadyPinned {
                    dependency: dependency.clone(),
                    existing: existing.as_str().to_string(),
                });
            } else {
                let pinned = format!("{reference}#{branch}");
                *value = Value::String(pinned.clone());
                outcomes.push(RewriteOutcome::Pinned {
                    dependency: dependency.clone(),
                    reference: pinned,
                });
            }
        }
    }
    outcomes
}

/// Rewrite the package manifest at `path` in place.
///
/// A missing manifest means the repository has no dependency file to pin and
/// is not an error. The file is rewritten only when at least one entry
/// changed, with 2-space indentation and a trailing newline.
pub fn rewrite_package_manifest(path: &Path, branch: &str) -> Result<Vec<RewriteOutcome>, ReleaseError> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(path).map_err(|source| ReleaseError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut doc: Value = serde_json::from_str(&text).map_err(|source| ReleaseError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    if !doc.is_object() {
        return Err(ReleaseError::NotAnObject);
    }

    let outcomes = rewrite_dependency_refs(&mut doc, branch);
    for outcome in &outcomes {
        if let RewriteOutcome::AlreadyPinned { dependency, existing } = outcome {
            warn!(%dependency, %existing, "dependency already pins a branch, leaving it untouched");
        }
    }

    if outcomes.iter().any(RewriteOutcome::is_pinned) {
        let rendered = format!(
            "{}\n",
            serde_json::to_string_pretty(&doc).expect("rewritten manifest serializes")
        );
        std::fs::write(path, rendered).map_err(|source| ReleaseError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    Ok(outcomes)
}

/// Cut a release branch in one workspace checkout: create the branch, pin
/// dependency references, commit the rewrite if anything changed, and push.
pub async fn cut_release_branch(
    vcs: &VcsRunner,
    dir: &Path,
    branch: &str,
) -> anyhow::Result<Vec<RewriteOutcome>> {
    vcs.create_branch(dir, branch).await?;
    let outcomes = rewrite_package_manifest(&dir.join(PACKAGE_MANIFEST), branch)?;
    if outcomes.iter().any(RewriteOutcome::is_pinned) {
        vcs.commit_all(dir, &format!("Pin workspace dependencies to {branch}"))
            .await?;
    }
    vcs.push_branch(dir, branch).await?;
    Ok(outcomes)
}
