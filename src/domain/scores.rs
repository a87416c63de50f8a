use crate::domain::errors::ScoringError;
use crate::domain::sector::Sector;
use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use tracing::{debug, warn};

/// Bound of a single article's per-sector score.
pub const MAX_ARTICLE_SCORE: i64 = 5;

/// Score for every sector of the catalogue.
///
/// Per-article maps hold values in `[-5, +5]`; accumulated scorecharts are
/// unbounded. Every field is always present, so a missing sector can only be
/// introduced at the backend boundary ([`SectorScores::from_backend_json`]),
/// where it is filled with zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SectorScores {
    #[serde(rename = "Technology")]
    pub technology: i64,
    #[serde(rename = "Semiconductors")]
    pub semiconductors: i64,
    #[serde(rename = "Financials")]
    pub financials: i64,
    #[serde(rename = "Healthcare")]
    pub healthcare: i64,
    #[serde(rename = "Energy")]
    pub energy: i64,
    #[serde(rename = "Airlines")]
    pub airlines: i64,
    #[serde(rename = "Consumer Discretionary")]
    pub consumer_discretionary: i64,
    #[serde(rename = "Consumer Staples")]
    pub consumer_staples: i64,
    #[serde(rename = "Commodities")]
    pub commodities: i64,
    #[serde(rename = "Utilities")]
    pub utilities: i64,
    #[serde(rename = "Real Estate")]
    pub real_estate: i64,
}

impl SectorScores {
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(&self, sector: Sector) -> i64 {
        match sector {
            Sector::Technology => self.technology,
            Sector::Semiconductors => self.semiconductors,
            Sector::Financials => self.financials,
            Sector::Healthcare => self.healthcare,
            Sector::Energy => self.energy,
            Sector::Airlines => self.airlines,
            Sector::ConsumerDiscretionary => self.consumer_discretionary,
            Sector::ConsumerStaples => self.consumer_staples,
            Sector::Commodities => self.commodities,
            Sector::Utilities => self.utilities,
            Sector::RealEstate => self.real_estate,
        }
    }

    pub fn get_mut(&mut self, sector: Sector) -> &mut i64 {
        match sector {
            Sector::Technology => &mut self.technology,
            Sector::Semiconductors => &mut self.semiconductors,
            Sector::Financials => &mut self.financials,
            Sector::Healthcare => &mut self.healthcare,
            Sector::Energy => &mut self.energy,
            Sector::Airlines => &mut self.airlines,
            Sector::ConsumerDiscretionary => &mut self.consumer_discretionary,
            Sector::ConsumerStaples => &mut self.consumer_staples,
            Sector::Commodities => &mut self.commodities,
            Sector::Utilities => &mut self.utilities,
            Sector::RealEstate => &mut self.real_estate,
        }
    }

    pub fn set(&mut self, sector: Sector, score: i64) {
        *self.get_mut(sector) = score;
    }

    pub fn with(mut self, sector: Sector, score: i64) -> Self {
        self.set(sector, score);
        self
    }

    /// Iterates in catalogue order.
    pub fn iter(&self) -> impl Iterator<Item = (Sector, i64)> + '_ {
        Sector::ALL.iter().map(move |&sector| (sector, self.get(sector)))
    }

    /// Applies `f` to every sector score.
    pub fn map(&self, mut f: impl FnMut(Sector, i64) -> i64) -> Self {
        let mut out = *self;
        for sector in Sector::ALL {
            out.set(sector, f(sector, self.get(sector)));
        }
        out
    }

    pub fn is_zero(&self) -> bool {
        self.iter().all(|(_, score)| score == 0)
    }

    /// Sectors sorted by descending score. The sort is stable, so ties keep
    /// catalogue order.
    pub fn ranked(&self) -> Vec<(Sector, i64)> {
        let mut ranked: Vec<(Sector, i64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Converts a scoring backend reply into a complete per-article map.
    ///
    /// The reply must be a flat JSON object. Missing sectors default to 0,
    /// unknown keys are ignored, values outside `[-5, +5]` are clamped. A
    /// non-object body or a non-integer sector value is a format error.
    pub fn from_backend_json(body: &str) -> Result<Self, ScoringError> {
        let value: serde_json::Value = serde_json::from_str(body.trim())
            .map_err(|e| ScoringError::MalformedResponse(e.to_string()))?;

        let object = value.as_object().ok_or_else(|| {
            ScoringError::MalformedResponse(format!("expected JSON object, got: {}", value))
        })?;

        let mut scores = Self::zero();
        for sector in Sector::ALL {
            let Some(raw) = object.get(sector.name()) else {
                debug!("SectorScores: '{}' missing from reply, defaulting to 0", sector);
                continue;
            };

            let score = raw
                .as_i64()
                .or_else(|| raw.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64))
                .ok_or_else(|| {
                    ScoringError::MalformedResponse(format!(
                        "non-integer score for {}: {}",
                        sector, raw
                    ))
                })?;

            if score.abs() > MAX_ARTICLE_SCORE {
                warn!(
                    "SectorScores: {} score {} out of range, clamping to ±{}",
                    sector, score, MAX_ARTICLE_SCORE
                );
            }
            scores.set(sector, score.clamp(-MAX_ARTICLE_SCORE, MAX_ARTICLE_SCORE));
        }

        Ok(scores)
    }

    /// One-line summary `Sector: +N, ...` in ranked order.
    pub fn summary(&self) -> String {
        self.ranked()
            .iter()
            .map(|(sector, score)| format!("{}: {:+}", sector, score))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl AddAssign<&SectorScores> for SectorScores {
    fn add_assign(&mut self, rhs: &SectorScores) {
        for sector in Sector::ALL {
            *self.get_mut(sector) += rhs.get(sector);
        }
    }
}

impl AddAssign for SectorScores {
    fn add_assign(&mut self, rhs: SectorScores) {
        *self += &rhs;
    }
}

impl Add for SectorScores {
    type Output = SectorScores;

    fn add(mut self, rhs: SectorScores) -> SectorScores {
        self += &rhs;
        self
    }
}

impl<'a> std::iter::Sum<&'a SectorScores> for SectorScores {
    fn sum<I: Iterator<Item = &'a SectorScores>>(iter: I) -> Self {
        iter.fold(SectorScores::zero(), |mut acc, s| {
            acc += s;
            acc
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_keys_default_to_zero() {
        let scores =
            SectorScores::from_backend_json(r#"{"Technology": 3, "Energy": -2}"#).unwrap();
        assert_eq!(scores.get(Sector::Technology), 3);
        assert_eq!(scores.get(Sector::Energy), -2);
        assert_eq!(scores.iter().count(), Sector::COUNT);
        assert_eq!(scores.get(Sector::RealEstate), 0);
    }

    #[test]
    fn test_out_of_range_is_clamped_and_unknown_keys_ignored() {
        let scores =
            SectorScores::from_backend_json(r#"{"Airlines": -9, "Crypto": 4, "Utilities": 2.0}"#)
                .unwrap();
        assert_eq!(scores.get(Sector::Airlines), -5);
        assert_eq!(scores.get(Sector::Utilities), 2);
        assert_eq!(scores.iter().map(|(_, s)| s).sum::<i64>(), -3);
    }

    #[test]
    fn test_malformed_bodies_are_format_errors() {
        for body in ["not json", "[1, 2, 3]", r#"{"Technology": "high"}"#, r#"{"Energy": 1.5}"#] {
            let err = SectorScores::from_backend_json(body).unwrap_err();
            assert!(
                matches!(err, ScoringError::MalformedResponse(_)),
                "expected format error for {}",
                body
            );
        }
    }

    #[test]
    fn test_ranked_is_stable_on_ties() {
        let scores = SectorScores::zero()
            .with(Sector::Energy, 4)
            .with(Sector::Financials, 4)
            .with(Sector::Airlines, -1);
        let ranked = scores.ranked();
        assert_eq!(ranked[0], (Sector::Financials, 4));
        assert_eq!(ranked[1], (Sector::Energy, 4));
        assert_eq!(ranked[2], (Sector::Technology, 0));
        assert_eq!(ranked[10], (Sector::Airlines, -1));
    }

    #[test]
    fn test_accumulation() {
        let a = SectorScores::zero().with(Sector::Technology, 5);
        let b = SectorScores::zero()
            .with(Sector::Technology, -2)
            .with(Sector::Healthcare, 1);
        let total: SectorScores = [a, b, b].iter().sum();
        assert_eq!(total.get(Sector::Technology), 1);
        assert_eq!(total.get(Sector::Healthcare), 2);
        assert!(!total.is_zero());
        assert!(SectorScores::zero().is_zero());
    }

    #[test]
    fn test_serializes_with_canonical_names() {
        let json = serde_json::to_value(SectorScores::zero().with(Sector::RealEstate, 2)).unwrap();
        assert_eq!(json["Real Estate"], 2);
        assert_eq!(json.as_object().unwrap().len(), Sector::COUNT);
    }
}
