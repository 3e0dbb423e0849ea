//! Patch execution.
//!
//! `run_patch` is the only place that touches the filesystem: it resolves
//! the script's target against the project root, reads it, runs the
//! substitution table and writes the result back.
//!
//! A run never writes when `dry_run` is set or when no rule changed the
//! text, so re-running an idempotent script leaves the file's mtime alone.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{PatchError, Result};
use crate::rewrite::RuleCount;
use crate::script_traits::PatchScript;

/// How a patch run behaves.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Project root the script's target is relative to.
    pub root: PathBuf,
    /// Report what would change without writing.
    pub dry_run: bool,
    /// Refuse to write when any rule matched nothing.
    pub strict: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dry_run: false,
            strict: false,
        }
    }
}

impl RunOptions {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

/// Apply a patch script to its target file.
///
/// # Returns
///
/// - `Ok(output)` - File read and (unless dry run) written back
/// - `Err` - File missing or unreadable, not UTF-8, a pattern failed to
///   compile, a rule matched nothing under `strict`, or the write failed.
///   The file is untouched in every error case.
///
/// A dry run never fails on unmatched rules so the counts can still be
/// shown; callers check `PatchOutput::ensure_all_matched` themselves.
///
/// # Example
///
/// ```ignore
/// use kkm_patch::script_runner::{run_patch, RunOptions};
/// use kkm_patch::scripts::CampbarFinal;
///
/// let output = run_patch(&CampbarFinal, &RunOptions::with_root("/src/kkm"))?;
/// assert!(output.changed);
/// ```
pub fn run_patch<S: PatchScript + ?Sized>(script: &S, options: &RunOptions) -> Result<PatchOutput> {
    let name = script.script_name();
    let joined = options.root.join(script.target());
    let path = std::path::absolute(&joined).map_err(|e| PatchError::io(&joined, e))?;
    let table = script.rules()?;

    info!(
        "run_patch: {} target={} rules={} dry_run={}",
        name,
        path.display(),
        table.rules().len(),
        options.dry_run
    );

    let content = read_utf8(&path)?;
    let report = table.apply(&content);

    for count in &report.counts {
        if count.count == 0 {
            warn!("{}: rule '{}' matched nothing", name, count.label);
        } else {
            debug!("{}: rule '{}' replaced {} match(es)", name, count.label, count.count);
        }
    }

    let output = PatchOutput {
        script: name.to_string(),
        path,
        counts: report.counts,
        changed: report.text != content,
        dry_run: options.dry_run,
    };
    if options.strict && !options.dry_run {
        output.ensure_all_matched()?;
    }

    let (changed, path) = (output.changed, &output.path);
    if changed && !options.dry_run {
        fs::write(path, &report.text).map_err(|e| PatchError::io(path, e))?;
        info!("Script {} wrote {}", name, path.display());
    } else if changed {
        info!("Script {} would change {} (dry run)", name, path.display());
    } else {
        info!("Script {} left {} unchanged", name, path.display());
    }

    Ok(output)
}

fn read_utf8(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| PatchError::io(path, e))?;
    String::from_utf8(bytes).map_err(|_| PatchError::Encoding(path.to_path_buf()))
}

/// Output from a patch run.
#[derive(Debug, Clone)]
pub struct PatchOutput {
    /// Script identifier.
    pub script: String,
    /// Resolved path of the edited file.
    pub path: PathBuf,
    /// Replacements per rule, in table order.
    pub counts: Vec<RuleCount>,
    /// Whether the rewritten text differs from the original.
    pub changed: bool,
    /// Whether the write was skipped because of dry-run mode.
    pub dry_run: bool,
}

impl PatchOutput {
    /// Total replacements across all rules.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Fail if any rule matched nothing.
    pub fn ensure_all_matched(&self) -> Result<()> {
        let labels: Vec<String> = self
            .counts
            .iter()
            .filter(|c| c.count == 0)
            .map(|c| c.label.clone())
            .collect();
        if labels.is_empty() {
            Ok(())
        } else {
            Err(PatchError::Unmatched {
                path: self.path.clone(),
                labels,
            })
        }
    }
}
