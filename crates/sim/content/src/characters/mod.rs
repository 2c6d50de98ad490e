//! Character kits.
//!
//! Each kit is a zero- or small-state value implementing [`sim_core::Kit`].
//! Per-run state lives on the engine, so one kit value can serve any
//! number of runs.

pub mod curves;
pub mod rosaria;
pub mod sethos;
pub mod xilonen;

use strum::{AsRefStr, Display, EnumIter, EnumString};

use sim_core::Kit;

pub use curves::TalentTable;
pub use rosaria::Rosaria;
pub use sethos::{AimLevel, Sethos};
pub use xilonen::Xilonen;

use crate::config::ContentConfig;

/// Catalog of available kits, as named in roster files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, EnumString, AsRefStr, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum KitKind {
    Rosaria,
    Xilonen,
    Sethos,
}

impl KitKind {
    pub fn build(self, config: &ContentConfig) -> Box<dyn Kit> {
        match self {
            KitKind::Rosaria => Box::new(Rosaria::new(config)),
            KitKind::Xilonen => Box::new(Xilonen::new()),
            KitKind::Sethos => Box::new(Sethos::new(config)),
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn kit_names_match_catalog_names() {
        let config = ContentConfig::default();
        for kind in KitKind::iter() {
            assert_eq!(kind.build(&config).name(), kind.as_ref());
        }
    }

    #[test]
    fn catalog_names_parse() {
        assert_eq!("sethos".parse::<KitKind>(), Ok(KitKind::Sethos));
        assert!("amber".parse::<KitKind>().is_err());
    }
}
