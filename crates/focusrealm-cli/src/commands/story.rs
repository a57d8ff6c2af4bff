use clap::Subcommand;
use serde_json::json;

use super::{open_dashboard, print_json, CmdResult};

#[derive(Subcommand)]
pub enum StoryAction {
    /// List chapters and the next unlock
    List,
    /// Read an unlocked chapter
    Open {
        /// Chapter number
        id: u32,
    },
}

pub fn run(action: StoryAction) -> CmdResult {
    let mut dash = open_dashboard()?;

    match action {
        StoryAction::List => {
            let progression = dash.progression();
            let chapters: Vec<_> = progression
                .story_chapters()
                .iter()
                .map(|c| {
                    json!({
                        "id": c.id,
                        "title": c.title,
                        "unlocked": c.unlocked,
                        "xpRequired": c.xp_required,
                    })
                })
                .collect();
            print_json(&json!({
                "currentChapter": progression.current_chapter(),
                "chapters": chapters,
                "nextUnlock": progression.next_unlock(),
            }))?;
        }
        StoryAction::Open { id } => {
            if !dash.open_chapter(id) {
                let hint = dash
                    .progression()
                    .next_unlock()
                    .map(|n| format!(" ({n})"))
                    .unwrap_or_default();
                return Err(format!("chapter {id} is locked or unknown{hint}").into());
            }
            if let Some(chapter) = dash
                .progression()
                .story_chapters()
                .iter()
                .find(|c| c.id == id)
            {
                print_json(chapter)?;
            }
        }
    }
    Ok(())
}
