//! Follow-up fixes for the campbar routes after `campbar-types`.

use std::path::Path;

use super::campbar_types::{wrap_eq_param, CAMPBAR_ROUTES};
use crate::error::Result;
use crate::rewrite::{Rule, RewriteTable};
use crate::script_traits::PatchScript;

/// Wraps the vote params `campbar-types` missed and asserts the
/// participant counts non-null in the join capacity check.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampbarFinal;

impl PatchScript for CampbarFinal {
    fn script_name(&self) -> &str {
        "campbar-final"
    }

    fn target(&self) -> &Path {
        Path::new(CAMPBAR_ROUTES)
    }

    fn rules(&self) -> Result<RewriteTable> {
        Ok(RewriteTable::new(vec![
            wrap_eq_param("tripDateUserVotes.dateOptionId", "dateOptionId")?.not_followed_by(')'),
            wrap_eq_param("tripDateVotes.id", "dateOptionId")?.not_followed_by(')'),
            Rule::literal(
                "participant count non-null",
                "if (trip[0].currentParticipants >= trip[0].maxParticipants)",
                "if (trip[0].currentParticipants! >= trip[0].maxParticipants!)",
            )?,
        ]))
    }

    fn success_lines(&self, _resolved: &Path) -> Vec<String> {
        vec!["✅ Applied final TypeScript fixes".to_string()]
    }
}
