//! TypeScript fixes for the campbar routes.
//!
//! Two kinds of edit:
//! - `eq(column, param)` comparisons get the route param wrapped in
//!   `getParam(...)`, which narrows Express's `string | string[]` params.
//! - `.insert(...).values({...})` calls switch camelCase keys to the
//!   snake_case column names of the Drizzle schema.

use std::path::Path;

use crate::error::Result;
use crate::rewrite::{Rule, RewriteTable};
use crate::script_traits::PatchScript;

pub(crate) const CAMPBAR_ROUTES: &str = "server/src/routes/campbarRoutes.ts";

/// `eq(column, param)` -> `eq(column, getParam(param))`
pub(crate) fn wrap_eq_param(column: &str, param: &str) -> Result<Rule> {
    Rule::literal(
        format!("getParam {column}"),
        &format!("eq({column}, {param})"),
        &format!("eq({column}, getParam({param}))"),
    )
}

/// Column/param pairs whose comparisons need `getParam()`.
const EQ_PARAMS: [(&str, &str); 7] = [
    ("tripBoards.id", "id"),
    ("tripParticipants.tripId", "id"),
    ("tripDateUserVotes.dateOptionId", "dateOptionId"),
    ("tripDateVotes.id", "dateOptionId"),
    ("tripGearItems.id", "itemId"),
    ("tripGearItems.tripId", "id"),
    ("tripMessages.tripId", "id"),
];

/// Wraps params and renames insert keys in `campbarRoutes.ts`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CampbarTypes;

impl PatchScript for CampbarTypes {
    fn script_name(&self) -> &str {
        "campbar-types"
    }

    fn target(&self) -> &Path {
        Path::new(CAMPBAR_ROUTES)
    }

    fn rules(&self) -> Result<RewriteTable> {
        let mut table = RewriteTable::default();
        for (column, param) in EQ_PARAMS {
            table.push(wrap_eq_param(column, param)?);
        }

        table.push(Rule::new(
            "insert tripParticipants",
            r"\.insert\(tripParticipants\)\.values\(\{\s*tripId: id,\s*userId: req\.user\.id,",
            ".insert(tripParticipants).values({\n            trip_id: getParam(id),\n            user_id: req.user.id,",
        )?);
        table.push(Rule::new(
            "insert tripDateUserVotes",
            r"\.insert\(tripDateUserVotes\)\.values\(\{\s*userId: req\.user\.id,\s*dateOptionId: dateOptionId",
            ".insert(tripDateUserVotes).values({\n            user_id: req.user.id,\n            date_option_id: getParam(dateOptionId)",
        )?);
        table.push(Rule::new(
            "insert tripMessages",
            r"\.insert\(tripMessages\)\.values\(\{\s*tripId: id,\s*userId: req\.user\.id,",
            ".insert(tripMessages).values({\n            trip_id: getParam(id),\n            user_id: req.user.id,",
        )?);

        Ok(table)
    }

    fn success_lines(&self, resolved: &Path) -> Vec<String> {
        vec![
            format!("✅ Fixed TypeScript errors in {}", resolved.display()),
            "Applied fixes:".to_string(),
            "  - Wrapped all UUID params with getParam()".to_string(),
            "  - Fixed camelCase -> snake_case in inserts".to_string(),
        ]
    }
}
