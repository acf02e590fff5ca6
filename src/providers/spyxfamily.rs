//! Webcomic site provider
//!
//! The site front page carries a latest-chapters widget; every link in it
//! is one chapter. The same chapter is often listed more than once with
//! differently decorated URLs, so duplicates are collapsed before the
//! list is returned, keeping the shortest URL per chapter.

use async_trait::async_trait;
use std::collections::HashMap;

use crate::clients::http::ApiClient;
use crate::error::{Error, Result};
use crate::html;
use crate::models::{Episode, NonScheduledEpisode, Source};
use crate::providers::EpisodeProvider;

const SPYXFAMILY_BASE_URL: &str = "https://w12.spyxmanga.com";
const WIDGET_ID: &str = r#"id="ceo_latest_comics_widget-3""#;

pub struct SpyXFamilyProvider {
    api: ApiClient,
}

impl SpyXFamilyProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(SPYXFAMILY_BASE_URL)?,
        })
    }
}

#[async_trait]
impl EpisodeProvider for SpyXFamilyProvider {
    async fn fetch_episodes(&self, source: &Source) -> Result<Vec<Episode>> {
        let page = self.api.get_text("/").await?;
        let episodes = parse_chapters(&page, source)?;
        dedup_and_sort(episodes)
    }
}

fn parse_chapters(page: &str, source: &Source) -> Result<Vec<NonScheduledEpisode>> {
    let widget = html::slice_between_ci(page, WIDGET_ID, "</ul>")
        .ok_or_else(|| Error::Parse("latest-chapters widget not found in page".to_string()))?;

    let mut episodes = Vec::new();
    let mut pos = 0;
    while let Some((li_start, li_end)) = html::next_tag_block_ci(widget, "<li", "</li>", pos) {
        let item = &widget[li_start..li_end];
        if let Some((a_start, a_end)) = html::next_tag_block_ci(item, "<a", "</a>", 0) {
            let link = &item[a_start..a_end];
            let url = html::attr_value_ci(html::opening_tag(link), "href")
                .ok_or_else(|| Error::Parse("chapter link without an href".to_string()))?;
            let text = html::strip_tags(&html::inner_after_open_tag(link));
            let chapter_id: String = text
                .chars()
                .filter(|c| !c.is_ascii_alphabetic() && *c != ',' && *c != ' ')
                .collect();

            episodes.push(NonScheduledEpisode {
                source: source.clone(),
                chapter_id,
                chapter_url: url.to_string(),
            });
        }
        pos = li_end;
    }

    Ok(episodes)
}

fn dedup_and_sort(episodes: Vec<NonScheduledEpisode>) -> Result<Vec<Episode>> {
    let mut by_chapter: HashMap<String, NonScheduledEpisode> = HashMap::new();
    for episode in episodes {
        match by_chapter.get(&episode.chapter_id) {
            // For duplicate chapters, keep the one with the shortest URL
            Some(existing) if existing.chapter_url.len() <= episode.chapter_url.len() => {}
            _ => {
                by_chapter.insert(episode.chapter_id.clone(), episode);
            }
        }
    }

    let mut keyed: Vec<(f64, NonScheduledEpisode)> = Vec::with_capacity(by_chapter.len());
    for (chapter_id, episode) in by_chapter {
        let number: f64 = chapter_id
            .parse()
            .map_err(|_| Error::Parse(format!("invalid chapter number: {:?}", chapter_id)))?;
        keyed.push((number, episode));
    }
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Ok(keyed
        .into_iter()
        .map(|(_, episode)| Episode::NonScheduled(episode))
        .collect())
}
