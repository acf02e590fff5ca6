//! TV episode tracker provider
//!
//! The all-seasons page lists every episode as a `list-group-item`: the
//! heading starts with an `S{season}E{episode}` code, and an inline list
//! underneath carries the air date (when announced) and the platform.
//! Season separators are marked `list-group-item-special` and skipped.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::clients::http::ApiClient;
use crate::error::{Error, Result};
use crate::html;
use crate::models::{Episode, ScheduledEpisode, Source};
use crate::providers::EpisodeProvider;

const THETVDB_BASE_URL: &str = "https://thetvdb.com";

pub struct TheTvDbProvider {
    api: ApiClient,
}

impl TheTvDbProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(THETVDB_BASE_URL)?,
        })
    }
}

#[async_trait]
impl EpisodeProvider for TheTvDbProvider {
    async fn fetch_episodes(&self, source: &Source) -> Result<Vec<Episode>> {
        let path = format!("/series/{}/allseasons/official", source.encoded_name());
        let page = self.api.get_text(&path).await?;
        parse_episodes(&page, source)
    }
}

struct ItemBounds {
    tag_start: usize,
    content_start: usize,
    special: bool,
}

fn parse_episodes(page: &str, source: &Source) -> Result<Vec<Episode>> {
    // Episode items contain nested <li> elements, so plain block walking
    // would stop at the wrong closing tag. Instead, locate every
    // list-group-item opening tag and treat the text up to the next one
    // as that item's content.
    let lc = html::to_lowercase_fast(page);
    let mut items: Vec<ItemBounds> = Vec::new();
    let mut pos = 0;
    while let Some(rel) = lc[pos..].find("<li") {
        let tag_start = pos + rel;
        let Some(gt) = page[tag_start..].find('>') else {
            break;
        };
        let content_start = tag_start + gt + 1;

        let tag = html::opening_tag(&page[tag_start..content_start]);
        if let Some(class) = html::attr_value_ci(tag, "class") {
            let classes: Vec<&str> = class.split_whitespace().collect();
            if classes.contains(&"list-group-item") {
                items.push(ItemBounds {
                    tag_start,
                    content_start,
                    special: classes.contains(&"list-group-item-special"),
                });
            }
        }
        pos = content_start;
    }

    let mut episodes = Vec::new();
    for (idx, item) in items.iter().enumerate() {
        if item.special {
            continue;
        }
        let content_end = items
            .get(idx + 1)
            .map(|next| next.tag_start)
            .unwrap_or(page.len());
        let segment = &page[item.content_start..content_end];
        episodes.push(parse_item(segment, source)?);
    }

    Ok(episodes)
}

fn parse_item(segment: &str, source: &Source) -> Result<Episode> {
    let heading = html::next_tag_block_ci(segment, "<h4", "</h4>", 0)
        .map(|(start, end)| html::strip_tags(&html::inner_after_open_tag(&segment[start..end])))
        .ok_or_else(|| Error::Parse("episode item without a heading".to_string()))?;
    let chapter_id = chapter_id_from_heading(&heading)?;

    let inline = html::slice_between_ci(segment, r#"<ul class="list-inline"#, "</ul>")
        .ok_or_else(|| {
            Error::Parse(format!("episode {} without release details", chapter_id))
        })?;

    let mut parts = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = html::next_tag_block_ci(inline, "<li", "</li>", pos) {
        let text = html::strip_tags(&html::inner_after_open_tag(&inline[start..end]));
        parts.push(html::normalize_entities(&text));
        pos = end;
    }

    let (released_date, platform) = match parts.as_slice() {
        [] => {
            return Err(Error::Parse(format!(
                "episode {} without release details",
                chapter_id
            )))
        }
        [platform] => (None, platform.clone()),
        [date, platform, ..] => (Some(parse_release_date(date)?), platform.clone()),
    };

    Ok(Episode::Scheduled(ScheduledEpisode {
        source: source.clone(),
        chapter_id,
        released_date,
        platform,
    }))
}

/// Turn a heading like "S4E03 The Final Problem" into the chapter id
/// "4x03"
fn chapter_id_from_heading(heading: &str) -> Result<String> {
    let code = heading
        .split_whitespace()
        .next()
        .ok_or_else(|| Error::Parse("empty episode heading".to_string()))?;
    let parse_error = || Error::Parse(format!("unexpected episode code: {:?}", code));

    let (season, episode) = code
        .trim_start_matches('S')
        .split_once('E')
        .ok_or_else(parse_error)?;
    let season: u32 = season.parse().map_err(|_| parse_error())?;
    let episode: u32 = episode.parse().map_err(|_| parse_error())?;
    Ok(format!("{}x{:02}", season, episode))
}

/// Air dates render like "January 15, 2017"
fn parse_release_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%B %d, %Y")
        .map_err(|_| Error::Parse(format!("invalid release date: {:?}", text)))
}
