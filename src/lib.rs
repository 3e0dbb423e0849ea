//! kkm-patch Library
//!
//! This library provides one-time regex maintenance edits for the KKM
//! source tree: a small substitution engine, the built-in patch scripts and
//! JSON patch plans.

pub mod cli;
pub mod error;
pub mod patch_plan;
pub mod rewrite;
pub mod script_runner;
pub mod script_traits;
pub mod scripts;

// Re-export main types for convenience
pub use error::{PatchError, Result};
pub use patch_plan::{PatchPlan, PlanRule};
pub use rewrite::{RewriteReport, RewriteTable, Rule, RuleCount};
pub use script_runner::{run_patch, PatchOutput, RunOptions};
pub use script_traits::PatchScript;
pub use scripts::{CampbarFinal, CampbarTypes, MarketplaceBanner, ScriptKind};
