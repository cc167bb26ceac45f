use std::collections::HashSet;

use lazy_static::lazy_static;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use sm_core::{validate_url, Error, Result};

const USER_AGENT: &str =
    concat!("Mozilla/5.0 (compatible; sm/", env!("CARGO_PKG_VERSION"), ")");

lazy_static! {
    static ref JSON_LD: Selector = selector("script[type='application/ld+json']");
    static ref OG_TITLE: Selector = selector("meta[property='og:title']");
    static ref H1: Selector = selector("h1");
    static ref TITLE: Selector = selector("title");
    static ref PARAGRAPH: Selector = selector("p");
    static ref CONTAINERS: Vec<Selector> = vec![
        selector("article"),
        selector("main"),
        selector("[itemprop='articleBody']"),
        selector("body"),
    ];
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

#[derive(Debug, Clone, Serialize)]
pub struct Article {
    pub url: String,
    pub title: Option<String>,
    pub text: String,
}

/// Fetches a page and pulls out its main article text.
#[derive(Debug, Clone)]
pub struct ArticleExtractor {
    client: Client,
}

impl ArticleExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub async fn extract(&self, url: &str) -> Result<Article> {
        let parsed = validate_url(url)?;
        tracing::debug!("Fetching article from {}", parsed);

        let response = self.client.get(parsed).send().await?.error_for_status()?;
        let html = response.text().await?;

        let document = Html::parse_document(&html);
        let text = article_text(&document)
            .ok_or_else(|| Error::Extraction(format!("no article text found at {}", url)))?;

        Ok(Article {
            url: url.to_string(),
            title: article_title(&document),
            text,
        })
    }
}

/// Main article text, preferring structured `articleBody` metadata over
/// paragraphs scraped from the markup.
pub fn article_text(document: &Html) -> Option<String> {
    if let Some(body) = json_ld_article_body(document) {
        return Some(body);
    }

    CONTAINERS.iter().find_map(|container| {
        // Nested containers select the same paragraphs more than once.
        let mut seen = HashSet::new();
        let paragraphs: Vec<String> = document
            .select(container)
            .flat_map(|el| el.select(&PARAGRAPH))
            .filter(|p| seen.insert(p.id()))
            .map(element_text)
            .filter(|p| !p.is_empty())
            .collect();
        (!paragraphs.is_empty()).then(|| paragraphs.join("\n\n"))
    })
}

pub fn article_title(document: &Html) -> Option<String> {
    let og = document
        .select(&OG_TITLE)
        .next()
        .and_then(|el| el.value().attr("content"))
        .map(|t| t.trim().to_string());

    og.into_iter()
        .chain(document.select(&H1).map(element_text))
        .chain(document.select(&TITLE).map(element_text))
        .find(|t| !t.is_empty())
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

fn json_ld_article_body(document: &Html) -> Option<String> {
    document.select(&JSON_LD).find_map(|script| {
        let raw = script.text().collect::<String>();
        let json = serde_json::from_str::<serde_json::Value>(raw.trim()).ok()?;
        find_article_body(&json)
    })
}

fn find_article_body(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Array(items) => items.iter().find_map(find_article_body),
        serde_json::Value::Object(obj) => {
            if let Some(body) = obj.get("articleBody").and_then(|b| b.as_str()) {
                let body = body.trim();
                if !body.is_empty() {
                    return Some(body.to_string());
                }
            }
            obj.get("@graph").and_then(find_article_body)
        }
        _ => None,
    }
}
