//! Profile mount points

use parking_lot::RwLock;
use serde::Serialize;

/// Heading of the card holding extracted skills
pub const SKILLS_CARD_TITLE: &str = "Competenze principali";

/// Where extracted profile content is written
pub trait BioTarget: Send + Sync {
    fn set_bio_text(&self, text: &str);

    /// Replace the whole role list
    fn replace_roles(&self, roles: &[String]);

    fn add_skill_card(&self, title: &str, chips: &[String]);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SkillCard {
    pub title: String,
    pub chips: Vec<String>,
}

/// Current content of the profile slots
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub bio_text: Option<String>,
    pub roles: Vec<String>,
    pub skill_cards: Vec<SkillCard>,
}

/// In-memory profile slots read by the HTTP layer
#[derive(Debug, Default)]
pub struct ProfileSlots {
    view: RwLock<ProfileView>,
}

impl ProfileSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` until something has been written
    pub fn snapshot(&self) -> Option<ProfileView> {
        let view = self.view.read();
        (*view != ProfileView::default()).then(|| view.clone())
    }
}

impl BioTarget for ProfileSlots {
    fn set_bio_text(&self, text: &str) {
        self.view.write().bio_text = Some(text.to_string());
    }

    fn replace_roles(&self, roles: &[String]) {
        self.view.write().roles = roles.to_vec();
    }

    fn add_skill_card(&self, title: &str, chips: &[String]) {
        self.view.write().skill_cards.push(SkillCard {
            title: title.to_string(),
            chips: chips.to_vec(),
        });
    }
}
