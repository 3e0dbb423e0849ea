//! Patch script contracts.
//!
//! Every one-time edit, built in or loaded from a JSON plan, implements
//! `PatchScript`. The runner only ever talks to this trait, so a script is
//! fully described by its target file, its substitution table and the
//! message it prints when done.

use std::path::Path;

use crate::error::Result;
use crate::rewrite::RewriteTable;

/// Trait for one-time patch scripts.
///
/// # Contract
///
/// - `script_name()`: Short identifier used in logs (e.g., "campbar-types").
/// - `target()`: Path of the file to edit, relative to the project root.
/// - `rules()`: The substitution table, compiled fresh on each call.
/// - `success_lines()`: Lines printed to stdout after a successful run.
///
/// # Invariants
///
/// - `target()` is relative; the runner joins it onto the project root.
/// - `rules()` only fails when a pattern does not compile.
///
/// # Example
///
/// ```ignore
/// use kkm_patch::scripts::campbar_types::CampbarTypes;
/// use kkm_patch::script_runner::{run_patch, RunOptions};
///
/// let output = run_patch(&CampbarTypes, &RunOptions::default())?;
/// for line in CampbarTypes.success_lines(&output.path) {
///     println!("{line}");
/// }
/// ```
pub trait PatchScript {
    /// Get the script identifier.
    fn script_name(&self) -> &str;

    /// Get the project-relative path of the file this script edits.
    fn target(&self) -> &Path;

    /// Build the substitution table.
    fn rules(&self) -> Result<RewriteTable>;

    /// Lines to print once the file has been rewritten.
    ///
    /// `resolved` is the full path that was edited.
    fn success_lines(&self, resolved: &Path) -> Vec<String>;
}
