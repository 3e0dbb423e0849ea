//! Syariah terms banner for the marketplace page.
//!
//! Everything from the hero container opener up to the first search
//! container opener is kept, and the banner block (title, three principle
//! cards, return policy card) is inserted before the search container.

use std::path::Path;

use crate::error::Result;
use crate::rewrite::{Rule, RewriteTable};
use crate::script_traits::PatchScript;

const TARGET: &str = "client/src/pages/MarketplacePage.tsx";

/// Hero container through the first search container, lazily across lines.
const HERO_TO_SEARCH: &str = r#"(<div className="max-w-4xl mx-auto relative z-10 text-center md:text-left">.*?)<div className="max-w-2xl mx-auto relative z-10">"#;

/// JSX inserted after the hero; ends by reopening the search container.
const BANNER: &str = include_str!("assets/marketplace_banner.tsx");

/// Inserts the banner into `MarketplacePage.tsx`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarketplaceBanner;

impl PatchScript for MarketplaceBanner {
    fn script_name(&self) -> &str {
        "marketplace-banner"
    }

    fn target(&self) -> &Path {
        Path::new(TARGET)
    }

    fn rules(&self) -> Result<RewriteTable> {
        let replacement = format!(
            "${{1}}\n{}",
            BANNER.trim_end_matches('\n').replace('$', "$$")
        );
        Ok(RewriteTable::new(vec![Rule::dot_all(
            "syariah banner",
            HERO_TO_SEARCH,
            replacement,
        )?]))
    }

    fn success_lines(&self, _resolved: &Path) -> Vec<String> {
        vec![
            "✅ Marketplace banner updated successfully!".to_string(),
            "Now run: git add -A && git commit -m 'feat: add Islamic Syariah banner' && git push origin main"
                .to_string(),
        ]
    }
}
