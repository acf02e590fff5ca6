//! Manga site provider
//!
//! The chapter index endpoint returns a page whose `ChapList` select box
//! lists every chapter: the option text is the raw chapter number, the
//! option value the chapter UUID. Chapters have no release schedule, so
//! everything here is non-scheduled.

use async_trait::async_trait;

use crate::clients::http::ApiClient;
use crate::error::{Error, Result};
use crate::html;
use crate::models::{Episode, NonScheduledEpisode, Source};
use crate::providers::EpisodeProvider;

const INMANGA_BASE_URL: &str = "https://inmanga.com";

pub struct InMangaProvider {
    api: ApiClient,
}

impl InMangaProvider {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api: ApiClient::new(INMANGA_BASE_URL)?,
        })
    }
}

#[async_trait]
impl EpisodeProvider for InMangaProvider {
    async fn fetch_episodes(&self, source: &Source) -> Result<Vec<Episode>> {
        let Source::InManga(inputs) = source else {
            return Err(Error::Internal(format!(
                "InManga provider invoked for a {} source",
                source.provider_name()
            )));
        };

        let path = format!(
            "/chapter/chapterIndexControls?identification={}",
            inputs.first_chapter_id
        );
        let page = self.api.get_text(&path).await?;
        parse_chapters(&page, source)
    }
}

fn parse_chapters(page: &str, source: &Source) -> Result<Vec<Episode>> {
    let list = html::slice_between_ci(page, r#"<select id="ChapList""#, "</select>")
        .ok_or_else(|| Error::Parse("chapter list not found in page".to_string()))?;

    let mut episodes = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = html::next_tag_block_ci(list, "<option", "</option>", pos) {
        let block = &list[start..end];
        let chapter_uuid = html::attr_value_ci(html::opening_tag(block), "value")
            .ok_or_else(|| Error::Parse("chapter option without a value attribute".to_string()))?;

        let raw = html::strip_tags(&html::inner_after_open_tag(block)).replace(',', "");
        let chapter_id = normalize_chapter_id(&raw)?;
        let chapter_url = format!(
            "{}/ver/manga/{}/{}/{}",
            INMANGA_BASE_URL,
            source.encoded_name(),
            chapter_id,
            chapter_uuid
        );

        episodes.push(Episode::NonScheduled(NonScheduledEpisode {
            source: source.clone(),
            chapter_id,
            chapter_url,
        }));
        pos = end;
    }

    Ok(episodes)
}

/// Normalize a raw chapter number: leading zeros are stripped, and a
/// fractional part of zero collapses to the integer form ("01.0" becomes
/// "1" while "1.10" stays "1.10").
fn normalize_chapter_id(raw: &str) -> Result<String> {
    let stripped = raw.trim_start_matches('0');
    if stripped.is_empty() {
        return Ok("0".to_string());
    }

    let value: f64 = stripped
        .parse()
        .map_err(|_| Error::Parse(format!("invalid chapter number: {:?}", raw)))?;
    if value.fract() == 0.0 {
        Ok(format!("{}", value as i64))
    } else {
        Ok(stripped.to_string())
    }
}
