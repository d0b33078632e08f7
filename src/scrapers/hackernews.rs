//! Hacker News front page extractor.
//!
//! Each story on the front page is a `tr.athing` row holding the rank and the
//! title link. The row right after it carries the score and the comment link.
//!
//! ```text
//! <tr class="athing">  span.rank "1."   span.titleline > a (title, href)
//! <tr>                 span.score "42 points"   a "7 comments"
//! ```

use crate::config::MAX_STORIES;
use crate::models::Record;
use crate::utils::{leading_count, scraped_at_now, truncate_for_log};
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, info, instrument, warn};
use url::Url;

static STORY_ROW: Lazy<Selector> = Lazy::new(|| selector("tr.athing"));
static RANK: Lazy<Selector> = Lazy::new(|| selector("span.rank"));
static TITLE_LINK: Lazy<Selector> = Lazy::new(|| selector("span.titleline > a"));
static SCORE: Lazy<Selector> = Lazy::new(|| selector("span.score"));
static ANCHOR: Lazy<Selector> = Lazy::new(|| selector("a"));

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid CSS")
}

/// Extract up to [`MAX_STORIES`] records from front page markup.
///
/// Rows without a title link are skipped silently. A row that fails to parse
/// (bad rank, unusable link) is logged and skipped; the remaining rows are
/// still processed, so this never fails as a whole. An empty result is valid.
///
/// # Arguments
///
/// * `html` - The front page markup
/// * `base` - URL the page was fetched from, used to resolve relative links
#[instrument(level = "info", skip_all, fields(base = %base))]
pub fn extract(html: &str, base: &Url) -> Vec<Record> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for (idx, row) in document.select(&STORY_ROW).take(MAX_STORIES).enumerate() {
        let position = idx + 1;
        match extract_row(row, position, base) {
            Ok(Some(record)) => {
                info!("Scraped #{}: {}", record.rank, truncate_for_log(&record.title, 50));
                records.push(record);
            }
            Ok(None) => debug!(position, "Story row has no title; skipping"),
            // Keep going: one malformed row must not cost the rest of the page.
            Err(e) => warn!(position, error = %e, "Error parsing story row; skipping"),
        }
    }

    info!(count = records.len(), "Extracted stories");
    records
}

/// Turn one `tr.athing` row into a record, or `None` if it has no title.
fn extract_row(
    row: ElementRef<'_>,
    position: usize,
    base: &Url,
) -> Result<Option<Record>, Box<dyn Error>> {
    let Some(title_link) = row.select(&TITLE_LINK).next() else {
        return Ok(None);
    };
    let title = element_text(title_link);
    if title.is_empty() {
        return Ok(None);
    }

    let rank = match row.select(&RANK).next() {
        Some(el) => parse_rank(&element_text(el))?,
        None => u32::try_from(position)?,
    };

    let href = title_link.value().attr("href").unwrap_or_default();
    let link = resolve_link(href, base)?;

    let (points, comments) = match metadata_row(row) {
        Some(meta) => (
            meta.select(&SCORE).next().map_or(0, |el| leading_count(&element_text(el))),
            comment_count(meta),
        ),
        None => (0, 0),
    };

    Ok(Some(Record {
        rank,
        title,
        link,
        points,
        comments,
        scraped_at: scraped_at_now(),
    }))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `"12."` -> 12. Ranks are 1-based, so zero is rejected too.
fn parse_rank(text: &str) -> Result<u32, Box<dyn Error>> {
    let digits = text.trim().trim_matches('.');
    match digits.parse::<u32>() {
        Ok(rank) if rank > 0 => Ok(rank),
        _ => Err(format!("invalid rank marker {:?}", text).into()),
    }
}

/// Make a story href absolute.
///
/// `item?id=…` discussion links and other relative hrefs are joined onto
/// `base`; hrefs that are already absolute are returned verbatim.
fn resolve_link(href: &str, base: &Url) -> Result<String, Box<dyn Error>> {
    let href = href.trim();
    if href.is_empty() {
        return Err("story link has no href".into());
    }
    if href.starts_with("item?") {
        return Ok(base.join(href)?.to_string());
    }

    match Url::parse(href) {
        Ok(_) => Ok(href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(base.join(href)?.to_string()),
        Err(e) => Err(format!("invalid story link {:?}: {}", href, e).into()),
    }
}

/// The first `<tr>` sibling following a story row.
fn metadata_row(row: ElementRef<'_>) -> Option<ElementRef<'_>> {
    row.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "tr")
}

/// Count from the first link mentioning "comment"; `discuss` and friends are 0.
fn comment_count(meta: ElementRef<'_>) -> u32 {
    meta.select(&ANCHOR)
        .map(element_text)
        .find(|text| text.contains("comment"))
        .map_or(0, |text| leading_count(&text))
}
