//! Start/sit advisory over an aggregated player record.
//!
//! The record is rendered into a prompt, the model is asked for a fixed JSON
//! shape, and the reply is parsed defensively: markdown fences and stray prose
//! are tolerated, and a parse failure degrades to a conservative default
//! rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::agent::llm::LlmClient;
use crate::domain::PlayerRecord;
use crate::error::{Result, ScoutError};

/// Structured start/sit analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    /// START, SIT or FLEX
    pub recommendation: String,
    /// HIGH, MEDIUM or LOW
    pub confidence: String,
    #[serde(default)]
    pub key_factors: Vec<String>,
    #[serde(default)]
    pub risks: String,
    #[serde(default)]
    pub upside: String,
    #[serde(default)]
    pub projected_points: f64,
    #[serde(default)]
    pub summary: String,
}

impl Analysis {
    fn unparseable() -> Self {
        Self {
            recommendation: "UNKNOWN".to_string(),
            confidence: "LOW".to_string(),
            key_factors: Vec::new(),
            risks: "Unable to analyze".to_string(),
            upside: "Unable to analyze".to_string(),
            projected_points: 0.0,
            summary: "Error parsing analysis".to_string(),
        }
    }
}

/// Per-player entry in a comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerRanking {
    pub player: String,
    pub rank: u32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub projected_points: f64,
}

/// Multi-player comparison result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comparison {
    #[serde(default)]
    pub rankings: Vec<PlayerRanking>,
    #[serde(default)]
    pub recommendation: String,
}

pub struct PlayerAdvisor {
    llm: LlmClient,
}

impl PlayerAdvisor {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }

    pub fn is_configured(&self) -> bool {
        self.llm.is_configured()
    }

    /// Analyze one player for a start/sit decision
    pub async fn analyze(&self, record: &PlayerRecord, matchup: Option<&Value>) -> Result<Analysis> {
        let prompt = build_analysis_prompt(record, matchup)?;

        info!(player = %record.display_name, "requesting start/sit analysis");
        let response = self.llm.chat(&prompt).await?;
        debug!(len = response.len(), "advisory response received");

        Ok(parse_analysis(&response))
    }

    /// Rank several players against each other for this week's lineup
    pub async fn compare(&self, records: &[PlayerRecord]) -> Result<Comparison> {
        if records.len() < 2 {
            return Err(ScoutError::Validation(
                "need at least 2 players to compare".to_string(),
            ));
        }

        let prompt = build_compare_prompt(records)?;
        let response = self.llm.chat(&prompt).await?;

        let json = match extract_json(&response) {
            Some(json) => json,
            None => {
                warn!("no JSON found in comparison response");
                return Ok(Comparison {
                    rankings: Vec::new(),
                    recommendation: "Unable to provide recommendation".to_string(),
                });
            }
        };

        Ok(serde_json::from_str(&json).unwrap_or_else(|e| {
            warn!(error = %e, "failed to parse comparison response");
            Comparison {
                rankings: Vec::new(),
                recommendation: "Unable to provide recommendation".to_string(),
            }
        }))
    }
}

fn build_analysis_prompt(record: &PlayerRecord, matchup: Option<&Value>) -> Result<String> {
    let mut prompt = format!(
        r#"You are an expert fantasy football analyst. Analyze the following player for fantasy football purposes.

Player Information:
{}
"#,
        serde_json::to_string_pretty(record)?
    );

    if let Some(matchup) = matchup {
        prompt.push_str(&format!(
            "\nUpcoming Schedule:\n{}\n",
            serde_json::to_string_pretty(matchup)?
        ));
    }

    prompt.push_str(
        r#"
Provide a detailed analysis with:
1. Recommendation: START, SIT or FLEX
2. Confidence: HIGH, MEDIUM or LOW
3. Key factors: 3-5 factors influencing the decision
4. Risks and upside
5. Projected fantasy points (standard scoring, conservative)

Return this exact JSON structure:
{
  "recommendation": "START|SIT|FLEX",
  "confidence": "HIGH|MEDIUM|LOW",
  "key_factors": ["factor1", "factor2"],
  "risks": "description of risks",
  "upside": "description of upside",
  "projected_points": 0.0,
  "summary": "brief summary of recommendation"
}

Return ONLY the JSON, no markdown, no explanation."#,
    );

    Ok(prompt)
}

fn build_compare_prompt(records: &[PlayerRecord]) -> Result<String> {
    Ok(format!(
        r#"You are an expert fantasy football analyst. Compare these players for this week's lineup:

{}

Rank them from best to worst. Return this exact JSON structure:
{{
  "rankings": [
    {{"player": "name", "rank": 1, "reasoning": "why this rank", "projected_points": 0.0}}
  ],
  "recommendation": "overall recommendation for the lineup"
}}

Return ONLY the JSON, no markdown, no explanation."#,
        serde_json::to_string_pretty(records)?
    ))
}

/// Parse an analysis reply, degrading to a conservative default when the
/// model returned something unusable
fn parse_analysis(response: &str) -> Analysis {
    let Some(json) = extract_json(response) else {
        warn!("no JSON found in analysis response");
        return Analysis::unparseable();
    };

    serde_json::from_str(&json).unwrap_or_else(|e| {
        warn!(error = %e, "failed to parse analysis response");
        Analysis::unparseable()
    })
}

/// Extract a JSON object from a reply that may carry markdown fences or
/// surrounding prose
fn extract_json(response: &str) -> Option<String> {
    let response = response.trim();

    if response.starts_with('{') {
        if let Some(end) = response.rfind('}') {
            return Some(response[..=end].to_string());
        }
    }

    if let Some(start) = response.find("```json") {
        let after = &response[start + 7..];
        if let Some(end) = after.find("```") {
            return Some(after[..end].trim().to_string());
        }
    }

    if let Some(start) = response.find("```") {
        let after = &response[start + 3..];
        if let Some(end) = after.find("```") {
            let content = after[..end].trim();
            if content.starts_with('{') {
                return Some(content.to_string());
            }
        }
    }

    let start = response.find('{')?;
    let end = response.rfind('}')?;
    (start < end).then(|| response[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_json_handles_pure_json() {
        let json = r#"{"recommendation": "START"}"#;
        assert_eq!(extract_json(json).as_deref(), Some(json));
    }

    #[test]
    fn extract_json_handles_markdown_fences() {
        let fenced = "```json\n{\"recommendation\": \"SIT\"}\n```";
        assert_eq!(
            extract_json(fenced).as_deref(),
            Some("{\"recommendation\": \"SIT\"}")
        );

        let plain_fence = "```\n{\"recommendation\": \"FLEX\"}\n```";
        assert_eq!(
            extract_json(plain_fence).as_deref(),
            Some("{\"recommendation\": \"FLEX\"}")
        );
    }

    #[test]
    fn extract_json_handles_surrounding_prose() {
        let messy = "Here is my analysis: {\"recommendation\": \"START\"} hope it helps";
        assert_eq!(
            extract_json(messy).as_deref(),
            Some("{\"recommendation\": \"START\"}")
        );
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn parse_analysis_fills_missing_fields() {
        let analysis =
            parse_analysis(r#"{"recommendation": "START", "confidence": "HIGH"}"#);
        assert_eq!(analysis.recommendation, "START");
        assert_eq!(analysis.confidence, "HIGH");
        assert!(analysis.key_factors.is_empty());
        assert_eq!(analysis.projected_points, 0.0);
    }

    #[test]
    fn unparseable_reply_degrades_to_default() {
        let analysis = parse_analysis("the model refused to answer");
        assert_eq!(analysis.recommendation, "UNKNOWN");
        assert_eq!(analysis.confidence, "LOW");
    }

    #[test]
    fn analysis_prompt_carries_the_record() {
        let record = PlayerRecord::fallback("patrick mahomes");
        let prompt = build_analysis_prompt(&record, None).unwrap();
        assert!(prompt.contains("Patrick Mahomes"));
        assert!(prompt.contains("Return ONLY the JSON"));
    }
}
