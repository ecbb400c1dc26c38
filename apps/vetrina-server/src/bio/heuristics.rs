//! Text heuristics for the profile document
//!
//! Pure functions over already-normalized text. The default rules carry the
//! Italian/English keywords used by the portfolio.

use std::sync::LazyLock;

use regex::Regex;

/// Longest bio text kept before the ellipsis
pub const MAX_BIO_CHARS: usize = 1200;
/// Segments considered by role segmentation
pub const MAX_ROLE_SEGMENTS: usize = 6;
/// Longest role entry
pub const MAX_ROLE_CHARS: usize = 180;
/// Characters captured after a skills label
pub const MAX_SKILLS_CAPTURE: usize = 250;
/// Chips kept from the skills capture
pub const MAX_SKILL_CHIPS: usize = 12;

pub const DEFAULT_ROLE_KEYWORDS: &[&str] = &[
    "Esperienza",
    "Experience",
    "Role",
    "Ruolo",
    "Manager",
    "Director",
    "Lead",
];

pub const DEFAULT_SKILL_LABELS: &[&str] = &["Competenze", "Skills"];

const SKILL_SEPARATORS: [char; 4] = ['•', ',', ';', '\n'];

static DEFAULT_SEGMENTATION: LazyLock<SegmentationRules> = LazyLock::new(|| {
    SegmentationRules::new(DEFAULT_ROLE_KEYWORDS, MAX_ROLE_SEGMENTS, MAX_ROLE_CHARS)
        .expect("default role pattern compiles")
});

static DEFAULT_SKILLS: LazyLock<SkillRules> = LazyLock::new(|| {
    SkillRules::new(DEFAULT_SKILL_LABELS, MAX_SKILLS_CAPTURE, MAX_SKILL_CHIPS)
        .expect("default skills pattern compiles")
});

/// Collapse whitespace runs to a single space, trim, and cap the length at
/// [`MAX_BIO_CHARS`] characters followed by `…`.
pub fn normalize_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() > MAX_BIO_CHARS {
        let mut truncated = truncate_chars(&collapsed, MAX_BIO_CHARS).to_string();
        truncated.push('…');
        truncated
    } else {
        collapsed
    }
}

fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Rules for cutting text into role entries.
///
/// Text is split right before every year (`19xx`/`20xx` as a whole word) and
/// every keyword occurrence, so each token starts its own segment.
#[derive(Debug, Clone)]
pub struct SegmentationRules {
    pattern: Regex,
    max_segments: usize,
    max_chars: usize,
}

impl SegmentationRules {
    /// Keywords match case-insensitively anywhere, including inside longer
    /// words. Year boundaries are ASCII-only: an accented letter right before
    /// a year does not glue the two together.
    pub fn new(keywords: &[&str], max_segments: usize, max_chars: usize) -> Result<Self, regex::Error> {
        let mut alternatives = vec![r"(?-u:\b)(?:19|20)[0-9]{2}(?-u:\b)".to_string()];
        alternatives.extend(keywords.iter().map(|k| regex::escape(k)));
        let pattern = Regex::new(&format!("(?i){}", alternatives.join("|")))?;

        Ok(Self {
            pattern,
            max_segments,
            max_chars,
        })
    }

    /// Split positions, excluding the start of the text
    fn split_points(&self, text: &str) -> Vec<usize> {
        let mut points = Vec::new();
        let mut from = 0;

        while let Some(m) = self.pattern.find_at(text, from) {
            if m.start() > 0 && points.last() != Some(&m.start()) {
                points.push(m.start());
            }
            // Step one character past the match start so overlapping tokens
            // are still found
            from = m.start() + text[m.start()..].chars().next().map_or(1, char::len_utf8);
            if from >= text.len() {
                break;
            }
        }

        points
    }

    /// First `max_segments` segments, trimmed, empties dropped, each capped
    /// at `max_chars` characters.
    pub fn segment(&self, text: &str) -> Vec<String> {
        let mut bounds = vec![0];
        bounds.extend(self.split_points(text));
        bounds.push(text.len());

        bounds
            .windows(2)
            .take(self.max_segments)
            .map(|w| text[w[0]..w[1]].trim())
            .filter(|s| !s.is_empty())
            .map(|s| truncate_chars(s, self.max_chars).to_string())
            .collect()
    }
}

impl Default for SegmentationRules {
    fn default() -> Self {
        DEFAULT_SEGMENTATION.clone()
    }
}

/// Rules for pulling a skills list out of text
#[derive(Debug, Clone)]
pub struct SkillRules {
    pattern: Regex,
    max_chips: usize,
}

impl SkillRules {
    pub fn new(labels: &[&str], max_capture: usize, max_chips: usize) -> Result<Self, regex::Error> {
        let labels = labels.iter().map(|l| regex::escape(l)).collect::<Vec<_>>();
        let pattern = Regex::new(&format!(
            r"(?i)(?:{})[:\s]+(.{{0,{}}})",
            labels.join("|"),
            max_capture
        ))?;

        Ok(Self { pattern, max_chips })
    }

    /// Chips following the first skills label, or `None` when no label is
    /// present. A label with nothing usable after it yields `Some(vec![])`.
    pub fn extract(&self, text: &str) -> Option<Vec<String>> {
        let captures = self.pattern.captures(text)?;
        let body = captures.get(1).map_or("", |m| m.as_str());

        Some(
            body.split(SKILL_SEPARATORS)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .take(self.max_chips)
                .map(String::from)
                .collect(),
        )
    }
}

impl Default for SkillRules {
    fn default() -> Self {
        DEFAULT_SKILLS.clone()
    }
}
