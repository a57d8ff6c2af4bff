use serde::{Deserialize, Serialize};

/// A narrative chapter gated by an XP threshold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryChapter {
    pub id: u32,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub unlocked: bool,
    pub xp_required: u64,
}

impl StoryChapter {
    fn new(id: u32, title: &str, content: &str, xp_required: u64) -> Self {
        Self {
            id,
            title: title.to_string(),
            content: content.to_string(),
            unlocked: xp_required == 0,
            xp_required,
        }
    }
}

/// The Focus Realm chronicles, in reading order.
pub fn default_chapters() -> Vec<StoryChapter> {
    vec![
        StoryChapter::new(
            1,
            "The Awakening",
            "In the mystical Focus Realm, ancient knowledge lies scattered. Your journey \
             begins as a Guardian of Concentration, tasked with restoring balance to this \
             magical land.",
            0,
        ),
        StoryChapter::new(
            2,
            "The First Crystal",
            "You discover the Crystal of Clarity, pulsing with gentle light. Each completed \
             task strengthens its glow, revealing hidden pathways through the realm.",
            100,
        ),
        StoryChapter::new(
            3,
            "The Time Keeper's Gift",
            "The ancient Time Keeper appears, gifting you the Sacred Hourglass. With it, you \
             can bend time itself, making each moment of focus more powerful.",
            250,
        ),
        StoryChapter::new(
            4,
            "The Pet Companion",
            "A mystical creature emerges from the Realm's heart - your eternal companion. \
             Together, you'll face greater challenges and unlock deeper mysteries.",
            500,
        ),
    ]
}

/// The next locked chapter and how much XP is still missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NextUnlock {
    pub chapter_id: u32,
    pub title: String,
    pub xp_needed: u64,
}

impl std::fmt::Display for NextUnlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} XP until \"{}\" unlocks!", self.xp_needed, self.title)
    }
}

/// Unlock every chapter whose threshold `xp` has reached.
///
/// Returns the chapters that changed state. Already unlocked chapters are
/// never touched, which keeps unlocking monotone.
pub(crate) fn unlock_reached(chapters: &mut [StoryChapter], xp: u64) -> Vec<StoryChapter> {
    let mut newly = Vec::new();
    for chapter in chapters.iter_mut() {
        if !chapter.unlocked && xp >= chapter.xp_required {
            chapter.unlocked = true;
            newly.push(chapter.clone());
        }
    }
    newly
}

pub(crate) fn next_unlock(chapters: &[StoryChapter], xp: u64) -> Option<NextUnlock> {
    chapters.iter().find(|c| !c.unlocked).map(|c| NextUnlock {
        chapter_id: c.id,
        title: c.title.clone(),
        xp_needed: c.xp_required.saturating_sub(xp),
    })
}
