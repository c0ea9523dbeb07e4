//! Result page parser built on scraper.

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::form_urlencoded;

use crate::engine::{ParsedEntry, ParsedPage, ParsedSitelink, ResultParser};
use crate::models::KeywordMatch;
use crate::query::Vertical;

/// A CSS selector that failed to compile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid selector {selector:?}: {reason}")]
pub struct SelectorError {
    /// The selector text.
    pub selector: String,
    /// Parser message.
    pub reason: String,
}

/// CSS selectors used to pick apart a result page.
///
/// Result markup changes often, so every selector is configurable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSelectors {
    /// One web result block.
    pub web_container: String,
    /// One news result block.
    pub news_container: String,
    /// One video result block.
    pub video_container: String,
    /// Title inside a block.
    pub title: String,
    /// Main link inside a block.
    pub link: String,
    /// Snippet inside a block.
    pub abstract_text: String,
    /// Source, date or duration line inside a block.
    pub metadata: String,
    /// Sitelink anchors inside a block.
    pub sitelink: String,
    /// Highlighted keywords inside a snippet.
    pub highlight: String,
    /// Link to the corrected query.
    pub correction: String,
    /// Notice that similar results were omitted.
    pub omitted_notice: String,
}

impl Default for ResultSelectors {
    fn default() -> Self {
        Self {
            web_container: "div.g".to_string(),
            news_container: "div.SoaBEf, div.g".to_string(),
            video_container: "div.RzdJxc, div.g".to_string(),
            title: "h3, div[role=\"heading\"]".to_string(),
            link: "a[href]".to_string(),
            abstract_text: "div.VwiC3b, div.GI74Re, span.st".to_string(),
            metadata: "span.MUxGbd, div.OSrXXb, div.CEMjEf".to_string(),
            sitelink: "table a[href], div.HiHjCd a[href]".to_string(),
            highlight: "em, b".to_string(),
            correction: "a.gL9Hy, a.spell_orig".to_string(),
            omitted_notice: "#ofr".to_string(),
        }
    }
}

#[derive(Debug)]
struct Compiled {
    web_container: Selector,
    news_container: Selector,
    video_container: Selector,
    title: Selector,
    link: Selector,
    abstract_text: Selector,
    metadata: Selector,
    sitelink: Selector,
    highlight: Selector,
    correction: Selector,
    omitted_notice: Selector,
}

fn compile(selector: &str) -> Result<Selector, SelectorError> {
    Selector::parse(selector).map_err(|e| SelectorError {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

impl Compiled {
    fn new(s: &ResultSelectors) -> Result<Self, SelectorError> {
        Ok(Self {
            web_container: compile(&s.web_container)?,
            news_container: compile(&s.news_container)?,
            video_container: compile(&s.video_container)?,
            title: compile(&s.title)?,
            link: compile(&s.link)?,
            abstract_text: compile(&s.abstract_text)?,
            metadata: compile(&s.metadata)?,
            sitelink: compile(&s.sitelink)?,
            highlight: compile(&s.highlight)?,
            correction: compile(&s.correction)?,
            omitted_notice: compile(&s.omitted_notice)?,
        })
    }

    fn container(&self, vertical: Vertical) -> &Selector {
        match vertical {
            Vertical::Web => &self.web_container,
            Vertical::News => &self.news_container,
            Vertical::Videos => &self.video_container,
        }
    }
}

/// Parses result pages with configurable CSS selectors.
#[derive(Debug)]
pub struct HtmlResultParser {
    selectors: ResultSelectors,
    compiled: Compiled,
}

impl HtmlResultParser {
    /// Creates a parser with the default selectors.
    pub fn new() -> Result<Self, SelectorError> {
        Self::with_selectors(ResultSelectors::default())
    }

    /// Creates a parser with custom selectors.
    pub fn with_selectors(selectors: ResultSelectors) -> Result<Self, SelectorError> {
        let compiled = Compiled::new(&selectors)?;
        Ok(Self {
            selectors,
            compiled,
        })
    }

    /// The selectors in use.
    #[must_use]
    pub fn selectors(&self) -> &ResultSelectors {
        &self.selectors
    }

    fn parse_entry(&self, block: ElementRef<'_>) -> Option<ParsedEntry> {
        let title = block
            .select(&self.compiled.title)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())?;

        let url = block
            .select(&self.compiled.link)
            .filter_map(|a| a.value().attr("href"))
            .find_map(unwrap_link);

        let snippet = block.select(&self.compiled.abstract_text).next();
        let abstract_text = snippet.map(element_text);
        let matches = match (snippet, abstract_text.as_deref()) {
            (Some(el), Some(text)) => Some(self.keyword_matches(el, text)),
            _ => None,
        };

        let metadata = block
            .select(&self.compiled.metadata)
            .next()
            .map(element_text)
            .filter(|m| !m.is_empty());

        let sitelinks: Vec<ParsedSitelink> = block
            .select(&self.compiled.sitelink)
            .filter_map(|a| {
                let href = a.value().attr("href").and_then(unwrap_link)?;
                Some(ParsedSitelink {
                    title: Some(element_text(a)),
                    url: Some(href),
                    abstract_text: None,
                })
            })
            .filter(|s| s.url != url)
            .collect();

        Some(ParsedEntry {
            title: Some(title),
            url,
            abstract_text,
            metadata,
            sitelinks: (!sitelinks.is_empty()).then_some(sitelinks),
            matches,
        })
    }

    /// Offsets are counted in characters of `text`.
    fn keyword_matches(&self, snippet: ElementRef<'_>, text: &str) -> Vec<KeywordMatch> {
        let mut matches = Vec::new();
        let mut cursor = 0;
        for highlight in snippet.select(&self.compiled.highlight) {
            let phrase = element_text(highlight);
            if phrase.is_empty() {
                continue;
            }
            if let Some(found) = text[cursor..].find(&phrase) {
                let byte_offset = cursor + found;
                matches.push(KeywordMatch::new(
                    phrase.clone(),
                    text[..byte_offset].chars().count(),
                ));
                cursor = byte_offset + phrase.len();
            }
        }
        matches
    }
}

impl ResultParser for HtmlResultParser {
    fn parse(&self, html: &str, vertical: Vertical) -> anyhow::Result<ParsedPage> {
        if html.trim().is_empty() {
            anyhow::bail!("empty document");
        }
        let document = Html::parse_document(html);

        let entries = document
            .select(self.compiled.container(vertical))
            .filter_map(|block| self.parse_entry(block))
            .collect();

        let showing_results_for = document
            .select(&self.compiled.correction)
            .next()
            .map(element_text)
            .filter(|c| !c.is_empty());

        Ok(ParsedPage {
            entries,
            autocorrected: showing_results_for.is_some(),
            showing_results_for,
            filtered: document.select(&self.compiled.omitted_notice).next().is_some(),
        })
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join("")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolves `/url?q=…` redirect links; other relative links are dropped.
fn unwrap_link(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let query = href.strip_prefix("/url?")?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "q" || key == "url")
        .map(|(_, value)| value.into_owned())
        .filter(|value| value.starts_with("http"))
}
