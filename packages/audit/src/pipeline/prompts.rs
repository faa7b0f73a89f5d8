//! LLM prompts for the audit pipeline.

use crate::schema::StructuredRecord;
use crate::traits::searcher::SearchHit;

/// System prompt for canonical brand inference.
pub const BRAND_SYSTEM_PROMPT: &str = "You identify the consumer brand operating a website. \
Answer with the canonical brand name only: no punctuation, no explanation, no quotation marks.";

/// Prompt for inferring the brand behind a hostname.
pub const BRAND_PROMPT: &str = r#"What consumer brand operates the website at {domain}?

The hostname may carry region or country labels that are not part of the
brand. Examples:
- patagonia.com -> Patagonia
- zambia.steers.africa -> Steers
- shop.allbirds.co.nz -> Allbirds

Respond with the brand name only."#;

/// System prompt for the structuring step.
pub const EXTRACTOR_SYSTEM_PROMPT: &str = r#"You are an e-commerce intelligence analyst verifying a brand's presence on the Amazon marketplace from raw search results.

Confidence assessment:
- High: an official brand store link is present, or 3+ products carry the brand name as a title prefix.
- Medium: brand products present but with mixed seller provenance or partial title matches.
- Low: fragmented or generic matches, possible name collision with other brands.

Extraction rules:
- Report the lowest observed price point per product; parse ratings as decimals (e.g. "4.5").
- Estimate the product count from search result indicators.
- Never fabricate or interpolate missing data; use "N/A" or empty fields when no definitive data exists.
- For generic brand names, require categorical alignment before counting a result as the brand's.

If the search results are empty, set amazon_presence to false with an
empty product list, and report confidence "High": the absence itself is
a confident finding.

Produce schema-compliant output only."#;

/// Prompt for structuring search results into a record.
pub const STRUCTURE_PROMPT: &str = r#"Structure the following marketplace search results for the brand "{brand}" (domain: {domain}).

Search results:
{hits}"#;

/// System prompt for the insight-generation step.
pub const ANALYST_SYSTEM_PROMPT: &str = r#"You are a senior e-commerce strategist. You receive a structured Amazon audit record and distill it into exactly 3 strategic insights.

Insight criteria, one of each:
1. Opportunity (icon Lightbulb): gaps in marketing, presentation, or catalog whitespace.
2. Growth (icon TrendingUp): pricing, category expansion, or fulfillment pivots.
3. Warning (icon AlertCircle): counterfeit threats, low stock, poor ratings, or intense competition.

If the record shows amazon_presence: false, frame the insights around
the opportunity cost of absence and the risk of resellers or dupes
filling the void, not around product optimization.

Return the completed report with the input record's fields carried over
unchanged and exactly 3 strategic insights."#;

/// Prompt for deriving insights from a structured record.
pub const ANALYZE_PROMPT: &str = r#"Analyze this structured Amazon data for the brand "{brand}":

{record}

Generate exactly 3 strategic insights and return the completed report."#;

/// Fill the brand-inference prompt.
pub fn format_brand_prompt(domain: &str) -> String {
    BRAND_PROMPT.replace("{domain}", domain)
}

/// Fill the structuring prompt with serialized search hits.
pub fn format_structure_prompt(brand: &str, domain: &str, hits: &[SearchHit]) -> String {
    let hits_json =
        serde_json::to_string_pretty(hits).unwrap_or_else(|_| "[]".to_string());
    STRUCTURE_PROMPT
        .replace("{brand}", brand)
        .replace("{domain}", domain)
        .replace("{hits}", &hits_json)
}

/// Fill the analysis prompt with the serialized record.
pub fn format_analyze_prompt(brand: &str, record: &StructuredRecord) -> String {
    let record_json =
        serde_json::to_string_pretty(record).unwrap_or_else(|_| "{}".to_string());
    ANALYZE_PROMPT
        .replace("{brand}", brand)
        .replace("{record}", &record_json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ConfidenceLevel;

    #[test]
    fn brand_prompt_substitutes_domain() {
        let prompt = format_brand_prompt("zambia.steers.africa");
        assert!(prompt.contains("website at zambia.steers.africa"));
        assert!(!prompt.contains("{domain}"));
    }

    #[test]
    fn structure_prompt_embeds_hits_as_json() {
        let hits = vec![SearchHit::new(
            "Acme Anvil",
            "https://amazon.com/dp/1",
            "Heavy duty",
        )];
        let prompt = format_structure_prompt("Acme", "acme.com", &hits);
        assert!(prompt.contains("\"Acme\""));
        assert!(prompt.contains("Acme Anvil"));
        assert!(!prompt.contains("{hits}"));
    }

    #[test]
    fn analyze_prompt_embeds_record() {
        let record = StructuredRecord {
            amazon_presence: false,
            confidence_level: ConfidenceLevel::High,
            primary_category: "Footwear".into(),
            estimated_product_count: "0".into(),
            top_products: vec![],
            ranking_data: None,
        };
        let prompt = format_analyze_prompt("Steers", &record);
        assert!(prompt.contains("\"amazon_presence\": false"));
        assert!(prompt.contains("Steers"));
    }
}
