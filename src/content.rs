//! Content blocks and their sources.
//!
//! Raw blocks reference sources inline with `<ref>ID</ref>` markers. Resolving
//! a block splits its sources into cited and additional ones and replaces each
//! marker with a link to the cited source.
//!
//! # Dataset Layout
//!
//! ```json
//! [
//!   {
//!     "category": "cost_of_living",
//!     "content": "<p>Energy prices rose <ref>ONS1</ref>.</p>",
//!     "sources": [
//!       { "id": "ONS1", "title": "ONS", "source": "https://www.ons.gov.uk/economy" }
//!     ]
//!   }
//! ]
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ContentError;

static CITATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<ref>([^<]+)</ref>").expect("citation pattern is valid")
});

const FAVICON_SERVICE: &str = "https://www.google.com/s2/favicons";
const FAVICON_SIZE: u32 = 64;

/// Marker left in place of a citation whose source is missing.
pub const MISSING_SOURCE_HTML: &str = r#"<span style="color: red;">Source not found</span>"#;

/// A source as it appears in the raw dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawSource {
    pub id: String,
    pub title: String,
    /// URL of the source.
    pub source: String,
}

/// A content block as it appears in the raw dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawContent {
    pub category: String,
    pub content: String,
    #[serde(default)]
    pub sources: Vec<RawSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub id: String,
    pub title: String,
    /// URL of the source.
    pub source: String,
    /// URL of a 64px favicon for the source's site.
    pub favicon: String,
}

impl From<RawSource> for Source {
    fn from(raw: RawSource) -> Self {
        let favicon = favicon_url(&raw.source);
        Self {
            id: raw.id,
            title: raw.title,
            source: raw.source,
            favicon,
        }
    }
}

/// A resolved content block, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentBlock {
    pub category: String,
    pub cited_sources: Vec<Source>,
    pub non_cited_sources: Vec<Source>,
    /// HTML with citation markers replaced by links.
    pub content: String,
}

impl ContentBlock {
    /// Category as a display title: underscores become spaces and each word is capitalised.
    pub fn title(&self) -> String {
        category_title(&self.category)
    }

    /// Short description of the block's sources, e.g. `"2 cited sources and 1 additional source"`.
    pub fn source_summary(&self) -> String {
        let cited = plural(self.cited_sources.len(), "cited source");
        match self.non_cited_sources.len() {
            0 => cited,
            n => format!("{cited} and {}", plural(n, "additional source")),
        }
    }
}

/// Ids of every `<ref>ID</ref>` marker in `content`, in order of appearance.
pub fn extract_citation_ids(content: &str) -> Vec<String> {
    CITATION
        .captures_iter(content)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Favicon URL for the site hosting `source_url`.
///
/// Unparseable URLs are passed to the favicon service as given.
pub fn favicon_url(source_url: &str) -> String {
    let domain = match Url::parse(source_url) {
        Ok(url) => {
            let host = url.host_str().unwrap_or_default();
            match url.port() {
                Some(port) => format!("{}://{host}:{port}", url.scheme()),
                None => format!("{}://{host}", url.scheme()),
            }
        }
        Err(e) => {
            log::warn!("Cannot parse source URL {source_url:?}: {e}");
            source_url.to_string()
        }
    };
    format!("{FAVICON_SERVICE}?domain={domain}&sz={FAVICON_SIZE}")
}

/// Split a raw block's sources into cited and additional ones and link its citations.
///
/// Sources keep their dataset order within each group. Citations with no
/// matching source are replaced with [`MISSING_SOURCE_HTML`].
pub fn resolve_citations(raw: RawContent) -> ContentBlock {
    let referenced: HashSet<String> = extract_citation_ids(&raw.content).into_iter().collect();
    let mut unresolved = referenced.clone();

    let mut content = raw.content;
    let mut cited_sources = Vec::new();
    let mut non_cited_sources = Vec::new();

    for raw_source in raw.sources {
        let source = Source::from(raw_source);
        if referenced.contains(&source.id) {
            unresolved.remove(&source.id);
            content = content.replace(&format!("<ref>{}</ref>", source.id), &source_link(&source));
            cited_sources.push(source);
        } else {
            non_cited_sources.push(source);
        }
    }

    for id in &unresolved {
        log::warn!("Citation {id:?} in {:?} has no matching source", raw.category);
        content = content.replace(&format!("<ref>{id}</ref>"), MISSING_SOURCE_HTML);
    }

    ContentBlock {
        category: raw.category,
        cited_sources,
        non_cited_sources,
        content,
    }
}

fn source_link(source: &Source) -> String {
    format!(
        r#"<a href="{}" title="{}" target="_blank" rel="noopener noreferrer"><img src="{}" alt="" width="16" height="16">{}</a>"#,
        escape_attr(&source.source),
        escape_attr(&source.title),
        escape_attr(&source.favicon),
        source.title
    )
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Load and resolve every block in a raw dataset file.
pub fn load_content(path: &Path) -> Result<Vec<ContentBlock>, ContentError> {
    let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ContentError::NotFound(path.to_path_buf()),
        _ => ContentError::Io(e),
    })?;
    let raw: Vec<RawContent> = serde_json::from_str(&data)?;
    log::info!("Loaded {} content blocks from {}", raw.len(), path.display());
    Ok(raw.into_iter().map(resolve_citations).collect())
}

/// Like [`load_content`], but logs any failure and yields no blocks instead.
pub fn load_or_empty(path: &Path) -> Vec<ContentBlock> {
    load_content(path).unwrap_or_else(|e| {
        log::error!("Error loading content: {e}");
        Vec::new()
    })
}

/// Decode an already resolved response body, as served to the reader.
pub fn parse_blocks(json: &str) -> Result<Vec<ContentBlock>, ContentError> {
    Ok(serde_json::from_str(json)?)
}

pub fn category_title(category: &str) -> String {
    category
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
