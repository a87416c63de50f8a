//! Scoring prompt for the language-model backend.
//!
//! The prompt pins the rubric (magnitude bands), disambiguates overlapping
//! sectors and asks for a JSON object keyed by the canonical sector names.

use crate::domain::sector::Sector;

pub const SYSTEM_MESSAGE: &str = "You are a financial analyst.";

const SCORING_GUIDELINES: &str = "\
SCORING GUIDELINES:
+5: Extremely bullish (e.g., \"Major breakthrough\", \"Record earnings beat 50%+\", \"Game-changing regulation\")
+3: Moderately bullish (e.g., \"Positive outlook\", \"Revenue increase 10-20%\", \"New partnerships\")
+1: Slightly bullish (e.g., \"Minor positive news\", \"Small price increases\")
 0: Neutral or unclear impact (e.g., \"General market news\", \"Unrelated to sector\")
-1: Slightly bearish (e.g., \"Minor concerns\", \"Small delays\")
-3: Moderately bearish (e.g., \"Disappointing results\", \"Regulatory warnings\", \"Supply chain issues\")
-5: Extremely bearish (e.g., \"Major crisis\", \"Bankruptcy concerns\", \"Severe regulations\")";

const INSTRUCTIONS: &str = "\
IMPORTANT:
- Consider both DIRECT impact (mentioned in article) and INDIRECT impact (supply chain, competition)
- If a sector is not mentioned or affected, use 0
- Be conservative: most news affects 2-4 sectors significantly, others should be 0 or ±1";

fn sector_definition(sector: Sector) -> (&'static str, &'static str) {
    match sector {
        Sector::Technology => (
            "Software companies, IT services, hardware manufacturers (EXCLUDING semiconductors)",
            "Microsoft, Apple, Oracle, IBM",
        ),
        Sector::Semiconductors => (
            "Chip manufacturers, semiconductor equipment makers",
            "NVIDIA, Intel, AMD, TSMC, ASML",
        ),
        Sector::Financials => (
            "Banks, insurance, investment firms, payment processors",
            "JPMorgan, Bank of America, Visa, Mastercard",
        ),
        Sector::Healthcare => (
            "Pharmaceuticals, biotech, medical devices, healthcare services",
            "Pfizer, Johnson & Johnson, UnitedHealth",
        ),
        Sector::Energy => (
            "Oil & gas, renewable energy, energy equipment",
            "Exxon, Chevron, ConocoPhillips",
        ),
        Sector::Airlines => (
            "Commercial airlines, air cargo",
            "American Airlines, Delta, United, Southwest",
        ),
        Sector::ConsumerDiscretionary => (
            "Retail, entertainment, automotive, luxury goods",
            "Amazon, Tesla, Nike, McDonald's",
        ),
        Sector::ConsumerStaples => (
            "Food, beverages, household products, tobacco",
            "Coca-Cola, Procter & Gamble, Walmart groceries",
        ),
        Sector::Commodities => (
            "Agricultural products, metals, raw materials",
            "Wheat, corn, copper, gold",
        ),
        Sector::Utilities => (
            "Electric, gas, water utilities, renewable infrastructure",
            "Duke Energy, Southern Company, NextEra Energy",
        ),
        Sector::RealEstate => (
            "REITs, real estate development, property management",
            "American Tower, Prologis, Simon Property",
        ),
    }
}

/// Builds the user prompt for one article.
pub struct ScoringPrompt;

impl ScoringPrompt {
    pub fn build(article_text: &str, source: &str, date: &str) -> String {
        let definitions = Sector::ALL
            .iter()
            .enumerate()
            .map(|(i, sector)| {
                let (scope, examples) = sector_definition(*sector);
                format!(
                    "{}. {} ({}): {}\n   - Examples: {}",
                    i + 1,
                    sector,
                    sector.ticker(),
                    scope,
                    examples
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are a financial analyst specializing in US stock market sentiment analysis. \
             Analyze this news article and rate its potential impact on {count} US market sectors.\n\n\
             {guidelines}\n\n\
             SECTOR DEFINITIONS:\n{definitions}\n\n\
             NEWS ARTICLE:\nSource: {source}\nDate: {date}\n\n{article_text}\n\n\
             {instructions}\n\n\
             Return ONLY valid JSON with ALL {count} sectors:\n{template}\n",
            count = Sector::COUNT,
            guidelines = SCORING_GUIDELINES,
            definitions = definitions,
            source = source,
            date = date,
            article_text = article_text,
            instructions = INSTRUCTIONS,
            template = Self::json_template(),
        )
    }

    /// `{"Technology": 0, ...}` with every canonical key.
    pub fn json_template() -> String {
        let fields = Sector::ALL
            .iter()
            .map(|sector| format!("\"{}\": 0", sector))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{{{}}}", fields)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::scores::SectorScores;

    #[test]
    fn test_template_parses_to_all_zero_scores() {
        let scores = SectorScores::from_backend_json(&ScoringPrompt::json_template()).unwrap();
        assert!(scores.is_zero());
    }

    #[test]
    fn test_prompt_contains_article_and_every_sector() {
        let prompt = ScoringPrompt::build("Title: Chips rally", "Chip Weekly", "2024-01-15");
        assert!(prompt.contains("Source: Chip Weekly"));
        assert!(prompt.contains("Date: 2024-01-15"));
        assert!(prompt.contains("Title: Chips rally"));
        assert!(prompt.contains("EXCLUDING semiconductors"));
        for sector in Sector::ALL {
            assert!(prompt.contains(&format!("{} ({})", sector, sector.ticker())));
        }
    }
}
