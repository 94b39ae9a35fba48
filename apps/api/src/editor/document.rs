//! Editable resume model with per-section edit history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::editor::error::EditorError;
use crate::extraction::prompt::title_case;
use crate::parser::resume_parser::ResumeData;
use crate::recommendation::generator::{Recommendation, RecommendationType};

/// One recorded change to a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditRecord {
    pub timestamp: DateTime<Utc>,
    pub previous: String,
    pub current: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditableSection {
    pub name: String,
    pub content: String,
    pub original_content: String,
    pub last_edited: DateTime<Utc>,
    pub history: Vec<EditRecord>,
}

impl EditableSection {
    pub fn new(name: &str, content: &str) -> Self {
        Self {
            name: name.to_string(),
            content: content.to_string(),
            original_content: content.to_string(),
            last_edited: Utc::now(),
            history: Vec::new(),
        }
    }

    /// Replaces the content, recording the edit. Returns `false` (and records
    /// nothing) when the content is unchanged.
    pub fn apply_change(&mut self, new_content: &str) -> bool {
        if self.content == new_content {
            return false;
        }

        let now = Utc::now();
        self.history.push(EditRecord {
            timestamp: now,
            previous: std::mem::replace(&mut self.content, new_content.to_string()),
            current: new_content.to_string(),
        });
        self.last_edited = now;
        true
    }

    /// Restores the content produced by edit `version`. The revert itself is
    /// recorded as a new edit; returns `false` when the content already matched.
    pub fn revert_to(&mut self, version: usize) -> Result<bool, EditorError> {
        let target = self
            .history
            .get(version)
            .map(|record| record.current.clone())
            .ok_or_else(|| EditorError::VersionOutOfRange {
                section: self.name.clone(),
                version,
                len: self.history.len(),
            })?;

        Ok(self.apply_change(&target))
    }

    /// Non-empty lines as bullets: lines already starting with `-` or `•`
    /// are kept, everything else gets a `- ` prefix. Section-break rules
    /// (`===`, `---`) are dropped.
    pub fn format_for_display(&self) -> String {
        self.content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !is_section_break(line))
            .map(|line| {
                if line.starts_with('-') || line.starts_with('•') {
                    line.to_string()
                } else {
                    format!("- {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn is_modified(&self) -> bool {
        self.content != self.original_content
    }
}

/// What applying a recommendation did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AppliedChange {
    /// The section did not exist and was created with the recommendation.
    Created { section: String },
    Updated { section: String },
    /// Already present, nothing to remove, or an unrecognised type.
    Unchanged { section: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct RecommendationOutcome {
    pub index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<AppliedChange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SectionHistory {
    pub section: String,
    /// Content differs from what the session started with.
    pub modified: bool,
    pub edits: Vec<EditRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditableResume {
    pub id: Uuid,
    pub raw_text: String,
    pub sections: Vec<EditableSection>,
    pub created_at: DateTime<Utc>,
}

impl EditableResume {
    pub fn new(raw_text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            raw_text: raw_text.to_string(),
            sections: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// One section per non-blank parsed section, named in Title Case.
    pub fn from_resume_data(data: &ResumeData) -> Self {
        let mut resume = Self::new(&data.raw_text);
        for (name, content) in data.sections.display_sections() {
            resume.add_section(&name, &content);
        }
        resume
    }

    pub fn section(&self, name: &str) -> Option<&EditableSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn section_mut(&mut self, name: &str) -> Option<&mut EditableSection> {
        self.sections.iter_mut().find(|s| s.name == name)
    }

    /// Appends a section. No-op (returns `false`) if the name is taken.
    pub fn add_section(&mut self, name: &str, content: &str) -> bool {
        if self.section(name).is_some() {
            return false;
        }
        self.sections.push(EditableSection::new(name, content));
        true
    }

    pub fn remove_section(&mut self, name: &str) -> Option<EditableSection> {
        let index = self.sections.iter().position(|s| s.name == name)?;
        Some(self.sections.remove(index))
    }

    pub fn update_section(&mut self, name: &str, content: &str) -> Result<bool, EditorError> {
        self.section_mut(name)
            .map(|section| section.apply_change(content))
            .ok_or_else(|| EditorError::SectionNotFound(name.to_string()))
    }

    /// Returns the section content after the revert and whether it changed.
    pub fn revert_section(
        &mut self,
        name: &str,
        version: usize,
    ) -> Result<(String, bool), EditorError> {
        let section = self
            .section_mut(name)
            .ok_or_else(|| EditorError::SectionNotFound(name.to_string()))?;
        let changed = section.revert_to(version)?;
        Ok((section.content.clone(), changed))
    }

    pub fn apply_recommendation(
        &mut self,
        recommendation: &Recommendation,
    ) -> Result<AppliedChange, EditorError> {
        let section = section_name(&recommendation.section);
        let content = recommendation.content.trim();
        if content.is_empty() {
            return Err(EditorError::EmptyRecommendation(section));
        }

        let Some(existing) = self.section_mut(&section) else {
            self.add_section(&section, &format!("- {content}"));
            return Ok(AppliedChange::Created { section });
        };

        let updated = apply_to_content(&existing.content, recommendation.kind, content);
        if existing.apply_change(&updated) {
            Ok(AppliedChange::Updated { section })
        } else {
            Ok(AppliedChange::Unchanged { section })
        }
    }

    /// Applies each recommendation in order. Failures are logged and reported
    /// per item; they never stop the batch.
    pub fn apply_recommendations(
        &mut self,
        recommendations: &[Recommendation],
    ) -> Vec<RecommendationOutcome> {
        let outcomes: Vec<_> = recommendations
            .iter()
            .enumerate()
            .map(|(index, rec)| match self.apply_recommendation(rec) {
                Ok(applied) => RecommendationOutcome {
                    index,
                    applied: Some(applied),
                    error: None,
                },
                Err(e) => {
                    warn!(resume_id = %self.id, index, "Could not apply recommendation: {e}");
                    RecommendationOutcome {
                        index,
                        applied: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect();

        info!(
            resume_id = %self.id,
            total = outcomes.len(),
            failed = outcomes.iter().filter(|o| o.error.is_some()).count(),
            "Applied recommendations"
        );
        outcomes
    }

    /// Edit history of every section that has been changed.
    pub fn edit_summary(&self) -> Vec<SectionHistory> {
        self.sections
            .iter()
            .filter(|s| !s.history.is_empty())
            .map(|s| SectionHistory {
                section: s.name.clone(),
                modified: s.is_modified(),
                edits: s.history.clone(),
            })
            .collect()
    }

    /// `=== Name ===` blocks of display-formatted content, blank sections skipped.
    pub fn final_text(&self) -> String {
        self.sections
            .iter()
            .filter_map(|s| {
                let formatted = s.format_for_display();
                (!formatted.is_empty()).then(|| format!("=== {} ===\n{formatted}", s.name))
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A line made only of `=` or only of `-`, at least three long.
fn is_section_break(line: &str) -> bool {
    line.len() >= 3 && (line.chars().all(|c| c == '=') || line.chars().all(|c| c == '-'))
}

/// `skills` / `SKILLS` / `contact_information` → Title Case section name.
fn section_name(raw: &str) -> String {
    let name = title_case(raw);
    if name.is_empty() {
        "Additional".to_string()
    } else {
        name
    }
}

fn apply_to_content(current: &str, kind: RecommendationType, content: &str) -> String {
    let bullet = format!("- {content}");

    match kind {
        RecommendationType::Add => {
            if current.lines().any(|line| line.trim() == bullet) {
                current.to_string()
            } else if current.trim().is_empty() {
                bullet
            } else {
                format!("{}\n{bullet}", current.trim_end())
            }
        }
        RecommendationType::Modify | RecommendationType::Emphasize => {
            let mut lines: Vec<String> = current.lines().map(str::to_string).collect();
            match lines.first_mut() {
                Some(first) if first.trim_start().starts_with('-') => {
                    let rest = first.trim_start().trim_start_matches('-').trim().to_string();
                    *first = format!("{bullet} ({rest})");
                }
                _ => lines.insert(0, bullet),
            }
            lines.join("\n")
        }
        RecommendationType::Remove => current
            .lines()
            .filter(|line| line.trim() != bullet)
            .collect::<Vec<_>>()
            .join("\n"),
        RecommendationType::Other => current.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::resume_parser::ResumeSections;

    fn rec(section: &str, kind: RecommendationType, content: &str) -> Recommendation {
        Recommendation {
            section: section.to_string(),
            kind,
            content: content.to_string(),
            reason: String::new(),
            priority: 5,
        }
    }

    fn resume() -> EditableResume {
        EditableResume::from_resume_data(&ResumeData {
            raw_text: "John Doe\nPython, Django".to_string(),
            sections: ResumeSections {
                contact_information: "John Doe\njohn@example.com".into(),
                skills: "- Python\n- Django".into(),
                experience: "Software Engineer at ABC Corp".into(),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_from_resume_data_uses_title_case_and_skips_blank() {
        let names: Vec<_> = resume().sections.iter().map(|s| s.name.clone()).collect();
        assert_eq!(names, vec!["Contact Information", "Experience", "Skills"]);
    }

    #[test]
    fn test_apply_change_records_only_real_changes() {
        let mut section = EditableSection::new("Skills", "Python");
        assert!(!section.apply_change("Python"));
        assert!(section.history.is_empty());

        assert!(section.apply_change("Python, Rust"));
        assert_eq!(section.history.len(), 1);
        assert_eq!(section.history[0].previous, "Python");
        assert_eq!(section.history[0].current, "Python, Rust");
        assert!(section.is_modified());
    }

    #[test]
    fn test_revert_restores_version_and_records_it() {
        let mut section = EditableSection::new("Skills", "v0");
        section.apply_change("v1");
        section.apply_change("v2");

        assert!(section.revert_to(0).unwrap());
        assert_eq!(section.content, "v1");
        assert_eq!(section.history.len(), 3);
        assert_eq!(section.history[2].previous, "v2");
        assert_eq!(section.history[2].current, "v1");
    }

    #[test]
    fn test_revert_to_current_content_records_nothing() {
        let mut resume = resume();
        resume.update_section("Skills", "- Rust").unwrap();

        let (content, changed) = resume.revert_section("Skills", 0).unwrap();
        assert_eq!(content, "- Rust");
        assert!(!changed);
        assert_eq!(resume.section("Skills").unwrap().history.len(), 1);
    }

    #[test]
    fn test_revert_out_of_range() {
        let mut section = EditableSection::new("Skills", "v0");
        assert_eq!(
            section.revert_to(0).unwrap_err(),
            EditorError::VersionOutOfRange {
                section: "Skills".to_string(),
                version: 0,
                len: 0
            }
        );
    }

    #[test]
    fn test_history_serializes_as_structured_json() {
        let mut section = EditableSection::new("Skills", "a");
        section.apply_change("b");
        let json = serde_json::to_value(&section.history[0]).unwrap();
        assert_eq!(json["previous"], "a");
        assert_eq!(json["current"], "b");
        assert!(json["timestamp"].is_string());

        let back: EditRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, section.history[0]);
    }

    #[test]
    fn test_format_for_display() {
        let section = EditableSection::new("Skills", "  Python \n\n- Django\n• Flask\n-SQL");
        assert_eq!(
            section.format_for_display(),
            "- Python\n- Django\n• Flask\n-SQL"
        );
    }

    #[test]
    fn test_format_for_display_drops_section_breaks() {
        let section = EditableSection::new("Skills", "Python\n===\n----\n--\n- Rust");
        assert_eq!(section.format_for_display(), "- Python\n--\n- Rust");
    }

    #[test]
    fn test_edit_summary_reports_modified_flag() {
        let mut resume = resume();
        resume.update_section("Skills", "- Rust").unwrap();
        resume.update_section("Skills", "- Python\n- Django").unwrap();

        let summary = resume.edit_summary();
        assert_eq!(summary[0].edits.len(), 2);
        assert!(!summary[0].modified);
    }

    #[test]
    fn test_add_recommendation_appends_once() {
        let mut resume = resume();
        let docker = rec("skills", RecommendationType::Add, "Docker");

        assert_eq!(
            resume.apply_recommendation(&docker).unwrap(),
            AppliedChange::Updated { section: "Skills".into() }
        );
        assert_eq!(resume.section("Skills").unwrap().content, "- Python\n- Django\n- Docker");

        assert_eq!(
            resume.apply_recommendation(&docker).unwrap(),
            AppliedChange::Unchanged { section: "Skills".into() }
        );
    }

    #[test]
    fn test_modify_prefixes_first_bullet() {
        let mut resume = resume();
        resume
            .apply_recommendation(&rec("Skills", RecommendationType::Emphasize, "Python 3.12"))
            .unwrap();
        assert_eq!(
            resume.section("Skills").unwrap().content,
            "- Python 3.12 (Python)\n- Django"
        );
    }

    #[test]
    fn test_modify_inserts_bullet_before_prose() {
        let mut resume = resume();
        resume
            .apply_recommendation(&rec(
                "Experience",
                RecommendationType::Modify,
                "Led database design",
            ))
            .unwrap();
        assert_eq!(
            resume.section("Experience").unwrap().content,
            "- Led database design\nSoftware Engineer at ABC Corp"
        );
    }

    #[test]
    fn test_remove_drops_matching_bullet() {
        let mut resume = resume();
        resume
            .apply_recommendation(&rec("Skills", RecommendationType::Remove, "Django"))
            .unwrap();
        assert_eq!(resume.section("Skills").unwrap().content, "- Python");
    }

    #[test]
    fn test_unknown_section_is_created() {
        let mut resume = resume();
        let applied = resume
            .apply_recommendation(&rec("certifications", RecommendationType::Add, "AWS SA"))
            .unwrap();
        assert_eq!(applied, AppliedChange::Created { section: "Certifications".into() });
        assert_eq!(resume.section("Certifications").unwrap().content, "- AWS SA");
    }

    #[test]
    fn test_batch_reports_failures_without_stopping() {
        let mut resume = resume();
        let outcomes = resume.apply_recommendations(&[
            rec("Skills", RecommendationType::Add, "  "),
            rec("Skills", RecommendationType::Add, "Kafka"),
        ]);

        assert!(outcomes[0].error.is_some());
        assert_eq!(
            outcomes[1].applied,
            Some(AppliedChange::Updated { section: "Skills".into() })
        );
        assert!(resume.section("Skills").unwrap().content.ends_with("- Kafka"));
    }

    #[test]
    fn test_update_missing_section() {
        let mut resume = resume();
        assert_eq!(
            resume.update_section("Awards", "x").unwrap_err(),
            EditorError::SectionNotFound("Awards".into())
        );
    }

    #[test]
    fn test_edit_summary_lists_changed_sections_only() {
        let mut resume = resume();
        resume.update_section("Skills", "- Rust").unwrap();
        let summary = resume.edit_summary();
        assert_eq!(summary.len(), 1);
        assert_eq!(summary[0].section, "Skills");
        assert_eq!(summary[0].edits[0].current, "- Rust");
    }

    #[test]
    fn test_final_text() {
        let mut resume = resume();
        resume.update_section("Experience", "").unwrap();
        assert_eq!(
            resume.final_text(),
            "=== Contact Information ===\n- John Doe\n- john@example.com\n\n\
             === Skills ===\n- Python\n- Django"
        );
    }
}
