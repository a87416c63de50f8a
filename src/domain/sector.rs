//! Market sector catalogue.
//!
//! Eleven fixed sectors, each backed by a representative ETF. The declaration
//! order of [`Sector::ALL`] is the canonical catalogue order and is used as the
//! tie-break whenever sectors are ranked.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Sector {
    Technology,
    Semiconductors,
    Financials,
    Healthcare,
    Energy,
    Airlines,
    ConsumerDiscretionary,
    ConsumerStaples,
    Commodities,
    Utilities,
    RealEstate,
}

impl Sector {
    pub const COUNT: usize = 11;

    pub const ALL: [Sector; Sector::COUNT] = [
        Sector::Technology,
        Sector::Semiconductors,
        Sector::Financials,
        Sector::Healthcare,
        Sector::Energy,
        Sector::Airlines,
        Sector::ConsumerDiscretionary,
        Sector::ConsumerStaples,
        Sector::Commodities,
        Sector::Utilities,
        Sector::RealEstate,
    ];

    /// Canonical display name, also the JSON key used by the scoring backend.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Technology => "Technology",
            Self::Semiconductors => "Semiconductors",
            Self::Financials => "Financials",
            Self::Healthcare => "Healthcare",
            Self::Energy => "Energy",
            Self::Airlines => "Airlines",
            Self::ConsumerDiscretionary => "Consumer Discretionary",
            Self::ConsumerStaples => "Consumer Staples",
            Self::Commodities => "Commodities",
            Self::Utilities => "Utilities",
            Self::RealEstate => "Real Estate",
        }
    }

    pub fn ticker(&self) -> &'static str {
        match self {
            Self::Technology => "XLK",
            Self::Semiconductors => "SMH",
            Self::Financials => "XLF",
            Self::Healthcare => "XLV",
            Self::Energy => "XLE",
            Self::Airlines => "JETS",
            Self::ConsumerDiscretionary => "XLY",
            Self::ConsumerStaples => "XLP",
            Self::Commodities => "DBC",
            Self::Utilities => "XLU",
            Self::RealEstate => "XLRE",
        }
    }

    /// Position in the catalogue, stable for the process lifetime.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Sector {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sector::ALL
            .iter()
            .copied()
            .find(|sector| sector.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| anyhow::anyhow!("Unknown sector: {}", s))
    }
}
