//! JSON patch plans.
//!
//! A plan describes a one-off edit as data so it can be run without adding
//! a built-in script:
//! ```json
//! {
//!   "name": "rename-order-status",
//!   "target": "server/src/routes/sellerRoutes.ts",
//!   "rules": [
//!     { "label": "status key", "pattern": "orderStatus:", "replacement": "order_status:" },
//!     { "label": "wrap id", "pattern": "eq\\(orders\\.id, id\\)",
//!       "replacement": "eq(orders.id, getParam(id))", "not_followed_by": ")" }
//!   ],
//!   "success_lines": ["✅ Order status keys renamed"]
//! }
//! ```
//!
//! Replacements use `$1` / `${name}` group references; `dot_all` makes `.`
//! match newlines.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{PatchError, Result};
use crate::rewrite::{Rule, RewriteTable};
use crate::script_traits::PatchScript;

/// One substitution in a plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanRule {
    /// Name used in logs and strict-mode errors.
    pub label: String,
    /// Regular expression (`regex` crate syntax).
    pub pattern: String,
    /// Replacement template.
    pub replacement: String,
    /// Let `.` match newlines.
    #[serde(default)]
    pub dot_all: bool,
    /// Skip matches followed by this single character.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub not_followed_by: Option<String>,
}

impl PlanRule {
    fn compile(&self) -> Result<Rule> {
        let rule = if self.dot_all {
            Rule::dot_all(&self.label, &self.pattern, &self.replacement)?
        } else {
            Rule::new(&self.label, &self.pattern, &self.replacement)?
        };
        match self.guard_char()? {
            Some(c) => Ok(rule.not_followed_by(c)),
            None => Ok(rule),
        }
    }

    fn guard_char(&self) -> Result<Option<char>> {
        let Some(ref guard) = self.not_followed_by else {
            return Ok(None);
        };
        let mut chars = guard.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Some(c)),
            _ => Err(PatchError::plan(format!(
                "rule '{}': not_followed_by must be exactly one character, got {:?}",
                self.label, guard
            ))),
        }
    }
}

/// A patch script loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatchPlan {
    pub name: String,
    /// File to edit, relative to the project root.
    pub target: PathBuf,
    pub rules: Vec<PlanRule>,
    /// Printed after a successful run. Defaults to a generic message.
    #[serde(default)]
    pub success_lines: Vec<String>,
}

impl PatchPlan {
    /// Save plan to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json).map_err(|e| PatchError::io(path.as_ref(), e))
    }

    /// Load plan from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| PatchError::io(path.as_ref(), e))?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Validate the plan without touching the target file.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(PatchError::plan("name must not be empty"));
        }

        if self.target.as_os_str().is_empty() {
            return Err(PatchError::plan("target must not be empty"));
        }
        if !self.target.is_relative() {
            return Err(PatchError::plan(format!(
                "target {:?} must be relative to the project root",
                self.target
            )));
        }
        if self.target.components().any(|c| c == Component::ParentDir) {
            return Err(PatchError::plan(format!(
                "target {:?} must not leave the project root",
                self.target
            )));
        }

        if self.rules.is_empty() {
            return Err(PatchError::plan("plan has no rules"));
        }
        for rule in &self.rules {
            if rule.label.trim().is_empty() {
                return Err(PatchError::plan("every rule needs a label"));
            }
            rule.compile()?;
        }

        Ok(())
    }
}

impl PatchScript for PatchPlan {
    fn script_name(&self) -> &str {
        &self.name
    }

    fn target(&self) -> &Path {
        &self.target
    }

    fn rules(&self) -> Result<RewriteTable> {
        let rules = self
            .rules
            .iter()
            .map(PlanRule::compile)
            .collect::<Result<Vec<_>>>()?;
        Ok(RewriteTable::new(rules))
    }

    fn success_lines(&self, resolved: &Path) -> Vec<String> {
        if self.success_lines.is_empty() {
            vec![format!("✅ Applied {} to {}", self.name, resolved.display())]
        } else {
            self.success_lines.clone()
        }
    }
}
