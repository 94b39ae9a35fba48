//! Resume ↔ job comparison.
//!
//! Deterministic: a requirement is matched when its text appears, case
//! insensitively, inside a resume section. No stemming or synonyms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::analysis::job_analyzer::JobRequirements;
use crate::extraction::prompt::title_case;
use crate::extraction::{Extractable, ExtractionResult, ExtractionSchema, FieldSpec, FieldValue};
use crate::parser::resume_parser::ResumeSections;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MatchItem {
    pub category: String,
    pub item: String,
    pub where_found: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GapItem {
    pub category: String,
    pub item: String,
    pub suggestion: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ComparisonResult {
    pub matches: Vec<MatchItem>,
    pub gaps: Vec<GapItem>,
    /// Percentage of requirements matched, 0–100, one decimal.
    pub match_score: f64,
    /// Same percentage per non-empty requirement category.
    pub section_scores: BTreeMap<String, f64>,
}

impl Extractable for ComparisonResult {
    fn schema() -> ExtractionSchema {
        ExtractionSchema::new(
            "comparison_result",
            vec![
                FieldSpec::records(
                    "matches",
                    "Requirements demonstrated in the resume",
                    vec![
                        FieldSpec::text("category", "Requirement category, e.g. required_skills"),
                        FieldSpec::text("item", "The requirement"),
                        FieldSpec::text("where_found", "Resume section it was found in"),
                    ],
                ),
                FieldSpec::records(
                    "gaps",
                    "Requirements missing from the resume",
                    vec![
                        FieldSpec::text("category", "Requirement category"),
                        FieldSpec::text("item", "The missing requirement"),
                        FieldSpec::text("suggestion", "How to address the gap"),
                    ],
                ),
                FieldSpec::number("match_score", "Overall match percentage", 0.0, 100.0),
                FieldSpec::number_map(
                    "section_scores",
                    "Match percentage per requirement category",
                    0.0,
                    100.0,
                ),
            ],
        )
    }

    fn from_result(result: &ExtractionResult) -> Self {
        let matches = result
            .records("matches")
            .iter()
            .map(|r| MatchItem {
                category: r.text("category"),
                item: r.text("item"),
                where_found: r.text("where_found"),
            })
            .filter(|m| !m.item.trim().is_empty())
            .collect();
        let gaps = result
            .records("gaps")
            .iter()
            .map(|r| GapItem {
                category: r.text("category"),
                item: r.text("item"),
                suggestion: r.text("suggestion"),
            })
            .filter(|g| !g.item.trim().is_empty())
            .collect();

        Self {
            matches,
            gaps,
            match_score: result.number("match_score"),
            section_scores: result.number_map("section_scores"),
        }
    }

    fn to_result(&self) -> ExtractionResult {
        let matches = self
            .matches
            .iter()
            .map(|m| {
                let mut r = ExtractionResult::default();
                r.insert("category", FieldValue::Text(m.category.clone()));
                r.insert("item", FieldValue::Text(m.item.clone()));
                r.insert("where_found", FieldValue::Text(m.where_found.clone()));
                r
            })
            .collect();
        let gaps = self
            .gaps
            .iter()
            .map(|g| {
                let mut r = ExtractionResult::default();
                r.insert("category", FieldValue::Text(g.category.clone()));
                r.insert("item", FieldValue::Text(g.item.clone()));
                r.insert("suggestion", FieldValue::Text(g.suggestion.clone()));
                r
            })
            .collect();

        let mut result = ExtractionResult::default();
        result.insert("matches", FieldValue::Records(matches));
        result.insert("gaps", FieldValue::Records(gaps));
        result.insert("match_score", FieldValue::Number(self.match_score));
        result.insert("section_scores", FieldValue::NumberMap(self.section_scores.clone()));
        result
    }
}

/// Resume section a gap in this category should be addressed in.
pub fn target_section(category: &str) -> &'static str {
    match category {
        "required_experience" | "responsibilities" => "Experience",
        "required_education" => "Education",
        _ => "Skills",
    }
}

/// `part / whole × 100`, one decimal; `0` when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    (part as f64 / whole as f64 * 1000.0).round() / 10.0
}

/// Classifies every requirement as matched or gap. Blank items are skipped.
pub fn compare(sections: &ResumeSections, requirements: &JobRequirements) -> ComparisonResult {
    let haystacks: Vec<(&str, String)> = sections
        .entries()
        .into_iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(field, text)| (field, text.to_lowercase()))
        .collect();

    let mut result = ComparisonResult::default();
    let mut matched_total = 0;
    let mut total = 0;

    for (category, items) in requirements.categories() {
        let mut matched = 0;
        let mut counted = 0;

        for item in items.iter().map(|i| i.trim()).filter(|i| !i.is_empty()) {
            counted += 1;
            let needle = item.to_lowercase();

            match haystacks.iter().find(|(_, text)| text.contains(&needle)) {
                Some((field, _)) => {
                    matched += 1;
                    result.matches.push(MatchItem {
                        category: category.to_string(),
                        item: item.to_string(),
                        where_found: format!("{} section", title_case(field)),
                    });
                }
                None => result.gaps.push(GapItem {
                    category: category.to_string(),
                    item: item.to_string(),
                    suggestion: format!(
                        "Add {item} to your {} section",
                        target_section(category)
                    ),
                }),
            }
        }

        if counted > 0 {
            result
                .section_scores
                .insert(category.to_string(), percentage(matched, counted));
        }
        matched_total += matched;
        total += counted;
    }

    result.match_score = percentage(matched_total, total);
    result
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMatch {
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub keyword_match_score: f64,
}

/// Case-insensitive containment of each keyword in the full resume text.
/// Blank keywords are skipped and do not count toward the score.
pub fn keyword_match(resume_text: &str, keywords: &[String]) -> KeywordMatch {
    let haystack = resume_text.to_lowercase();
    let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = keywords
        .iter()
        .map(|k| k.trim())
        .filter(|k| !k.is_empty())
        .map(str::to_string)
        .partition(|k| haystack.contains(&k.to_lowercase()));

    let total = matched_keywords.len() + missing_keywords.len();
    KeywordMatch {
        keyword_match_score: percentage(matched_keywords.len(), total),
        matched_keywords,
        missing_keywords,
    }
}

/// Renders a comparison as the text block fed to the recommendation prompt.
pub fn to_prompt_block(comparison: &ComparisonResult) -> String {
    let mut out = format!("Overall Match Score: {}%\n\n", comparison.match_score);

    out.push_str("=== Matches ===\n");
    for m in &comparison.matches {
        out.push_str(&format!("- {} (Found in {})\n", m.item, m.where_found));
    }
    out.push_str("\n=== Gaps ===\n");
    for g in &comparison.gaps {
        out.push_str(&format!("- {} (Suggestion: {})\n", g.item, g.suggestion));
    }
    out.push_str("\n=== Section Scores ===\n");
    for (category, score) in &comparison.section_scores {
        out.push_str(&format!("- {}: {score}%\n", title_case(category)));
    }
    out
}
