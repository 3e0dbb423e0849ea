//! Built-in patch scripts.
//!
//! Each submodule holds one one-time edit against the KKM source tree and
//! implements `PatchScript` for it:
//! - `MarketplaceBanner` for `client/src/pages/MarketplacePage.tsx`
//! - `CampbarTypes` for `server/src/routes/campbarRoutes.ts`
//! - `CampbarFinal` for `server/src/routes/campbarRoutes.ts`

pub mod campbar_final;
pub mod campbar_types;
pub mod marketplace_banner;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::script_traits::PatchScript;

pub use campbar_final::CampbarFinal;
pub use campbar_types::CampbarTypes;
pub use marketplace_banner::MarketplaceBanner;

/// Names of the built-in scripts as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScriptKind {
    /// Insert the Syariah terms banner into the marketplace page.
    MarketplaceBanner,
    /// Wrap route params with getParam() and snake_case insert keys.
    CampbarTypes,
    /// Remaining getParam() wraps and non-null assertions.
    CampbarFinal,
}

impl ScriptKind {
    /// One-line description shown by `kkm-patch list`.
    pub fn description(&self) -> &'static str {
        match self {
            Self::MarketplaceBanner => "Insert the Syariah terms banner into the marketplace page",
            Self::CampbarTypes => "Wrap campbar route params with getParam() and fix insert keys",
            Self::CampbarFinal => "Final getParam() wraps and participant-count null assertions",
        }
    }

    /// Get the script implementation for this name.
    pub fn script(&self) -> Box<dyn PatchScript> {
        match self {
            Self::MarketplaceBanner => Box::new(MarketplaceBanner),
            Self::CampbarTypes => Box::new(CampbarTypes),
            Self::CampbarFinal => Box::new(CampbarFinal),
        }
    }
}
