//! Bio extraction
//!
//! Best-effort hydration of the profile section from one designated document:
//! plain text of its first pages, normalized and truncated, then cut into role
//! entries and a skills chip set.

mod extractor;
pub mod heuristics;
mod slots;

pub use extractor::{BioExtractor, MAX_TEXT_PAGES, PROFILE_FALLBACK_FILE};
pub use heuristics::{normalize_text, SegmentationRules, SkillRules};
pub use slots::{BioTarget, ProfileSlots, ProfileView, SkillCard, SKILLS_CARD_TITLE};

/// Output of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BioExtractionResult {
    pub bio_text: String,
    pub role_segments: Vec<String>,
    /// `None` when the text has no skills label
    pub skill_chips: Option<Vec<String>>,
}

impl BioExtractionResult {
    /// Run the heuristics over raw document text
    pub fn from_text(raw: &str, segmentation: &SegmentationRules, skills: &SkillRules) -> Self {
        let bio_text = normalize_text(raw);
        let role_segments = segmentation.segment(&bio_text);
        let skill_chips = skills.extract(&bio_text);

        Self {
            bio_text,
            role_segments,
            skill_chips,
        }
    }

    /// Write the result into `target`. Empty parts leave the existing content
    /// alone; the skills card is added whenever a label was found.
    pub fn apply(&self, target: &dyn BioTarget) {
        if !self.bio_text.is_empty() {
            target.set_bio_text(&self.bio_text);
        }
        if !self.role_segments.is_empty() {
            target.replace_roles(&self.role_segments);
        }
        if let Some(chips) = &self.skill_chips {
            target.add_skill_card(SKILLS_CARD_TITLE, chips);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_text(raw: &str) -> BioExtractionResult {
        BioExtractionResult::from_text(raw, &SegmentationRules::default(), &SkillRules::default())
    }

    #[test]
    fn test_from_text_sample() {
        let result = from_text("Experience   2019\nManager at X\n\nSkills: Go, testing; design");

        assert_eq!(
            result.bio_text,
            "Experience 2019 Manager at X Skills: Go, testing; design"
        );
        assert_eq!(result.role_segments.len(), 3);
        assert_eq!(
            result.skill_chips,
            Some(vec!["Go".to_string(), "testing".to_string(), "design".to_string()])
        );
    }

    #[test]
    fn test_bio_text_bounds() {
        let result = from_text(&"Lorem  ipsum\n dolor ".repeat(200));
        assert!(result.bio_text.chars().count() <= 1203);
        assert!(!result.bio_text.contains("  "));
    }

    #[test]
    fn test_apply_writes_all_slots() {
        let slots = ProfileSlots::new();
        from_text("Experience 2019 Manager at X Skills: Go, testing; design").apply(&slots);

        let view = slots.snapshot().unwrap();
        assert_eq!(
            view.bio_text.as_deref(),
            Some("Experience 2019 Manager at X Skills: Go, testing; design")
        );
        assert_eq!(view.roles[1], "2019");
        assert_eq!(view.skill_cards.len(), 1);
        assert_eq!(view.skill_cards[0].title, "Competenze principali");
        assert_eq!(view.skill_cards[0].chips, vec!["Go", "testing", "design"]);
    }

    #[test]
    fn test_apply_empty_result_leaves_slots_untouched() {
        let slots = ProfileSlots::new();
        from_text("   \n  ").apply(&slots);
        assert!(slots.snapshot().is_none());
    }

    #[test]
    fn test_apply_label_without_chips_still_adds_card() {
        let slots = ProfileSlots::new();
        from_text("Skills: ; ,").apply(&slots);

        let view = slots.snapshot().unwrap();
        assert_eq!(view.skill_cards.len(), 1);
        assert!(view.skill_cards[0].chips.is_empty());
    }

    #[test]
    fn test_apply_without_skills_label() {
        let slots = ProfileSlots::new();
        from_text("Ruolo: Direttore di stabilimento").apply(&slots);

        let view = slots.snapshot().unwrap();
        assert!(view.skill_cards.is_empty());
        assert_eq!(view.roles, vec!["Ruolo: Direttore di stabilimento"]);
    }
}
