//! Regex substitution engine.
//!
//! A `RewriteTable` is an ordered list of `Rule`s. Each rule replaces every
//! non-overlapping match in the output of the rule before it, so later rules
//! see the edits of earlier ones.
//!
//! Replacement templates use the `regex` crate syntax: `$1`, `${1}` or
//! `${name}` refer to capture groups and `$$` is a literal dollar sign.

use regex::{Regex, RegexBuilder};

use crate::error::{PatchError, Result};

/// A single substitution.
#[derive(Debug, Clone)]
pub struct Rule {
    label: String,
    regex: Regex,
    replacement: String,
    not_followed_by: Option<char>,
}

impl Rule {
    /// Build a rule from a regular expression and a replacement template.
    pub fn new(
        label: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::build(label.into(), pattern, replacement.into(), false)
    }

    /// Build a rule where `.` also matches newlines.
    pub fn dot_all(
        label: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        Self::build(label.into(), pattern, replacement.into(), true)
    }

    /// Build a rule that swaps one exact piece of text for another.
    ///
    /// Neither side is interpreted: regex metacharacters in `needle` and
    /// `$` in `replacement` are escaped.
    pub fn literal(label: impl Into<String>, needle: &str, replacement: &str) -> Result<Self> {
        Self::build(
            label.into(),
            &regex::escape(needle),
            replacement.replace('$', "$$"),
            false,
        )
    }

    fn build(label: String, pattern: &str, replacement: String, dot_all: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .dot_matches_new_line(dot_all)
            .build()
            .map_err(|source| PatchError::Pattern {
                label: label.clone(),
                source,
            })?;
        Ok(Self {
            label,
            regex,
            replacement,
            not_followed_by: None,
        })
    }

    /// Skip matches that are immediately followed by `guard`.
    ///
    /// The whole match is skipped; nothing is retried at a shorter length.
    /// For a fixed-text pattern this behaves like a trailing negative
    /// lookahead such as `(?!\))`, which the `regex` crate does not support.
    /// For variable-length patterns it does not: `\w+` guarded by `)` leaves
    /// `abc)` alone where a lookahead would still rewrite `ab`.
    pub fn not_followed_by(mut self, guard: char) -> Self {
        self.not_followed_by = Some(guard);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    pub fn guard(&self) -> Option<char> {
        self.not_followed_by
    }

    /// Replace all matches in `input`, returning the new text and the number
    /// of replacements made. Guarded matches are left alone and not counted.
    pub fn apply(&self, input: &str) -> (String, usize) {
        let mut out = String::with_capacity(input.len());
        let mut last = 0;
        let mut count = 0;

        for caps in self.regex.captures_iter(input) {
            let Some(whole) = caps.get(0) else {
                continue;
            };
            if let Some(guard) = self.not_followed_by {
                if input[whole.end()..].starts_with(guard) {
                    continue;
                }
            }
            out.push_str(&input[last..whole.start()]);
            caps.expand(&self.replacement, &mut out);
            last = whole.end();
            count += 1;
        }

        if count == 0 {
            return (input.to_string(), 0);
        }
        out.push_str(&input[last..]);
        (out, count)
    }
}

/// Match count for one rule of a table run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleCount {
    pub label: String,
    pub count: usize,
}

/// Result of running a `RewriteTable` over some text.
#[derive(Debug, Clone)]
pub struct RewriteReport {
    /// Rewritten text.
    pub text: String,
    /// One entry per rule, in table order.
    pub counts: Vec<RuleCount>,
}

impl RewriteReport {
    /// Total replacements across all rules.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }

    /// Labels of rules that matched nothing.
    pub fn unmatched(&self) -> Vec<&str> {
        self.counts
            .iter()
            .filter(|c| c.count == 0)
            .map(|c| c.label.as_str())
            .collect()
    }
}

/// Ordered list of substitutions.
#[derive(Debug, Clone, Default)]
pub struct RewriteTable {
    rules: Vec<Rule>,
}

impl RewriteTable {
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run every rule once, in order.
    pub fn apply(&self, input: &str) -> RewriteReport {
        let mut text = input.to_string();
        let mut counts = Vec::with_capacity(self.rules.len());
        for rule in &self.rules {
            let (next, count) = rule.apply(&text);
            text = next;
            counts.push(RuleCount {
                label: rule.label.clone(),
                count,
            });
        }
        RewriteReport { text, counts }
    }
}
