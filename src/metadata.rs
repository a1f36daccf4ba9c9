//! Best-effort article metadata resolution.
//!
//! Resolution is infallible by contract: the poster template has defined
//! placeholder behavior for empty fields, so no failure here ever needs to
//! reach the caller. The fallback order is fixed: feed entry first,
//! Open-Graph/HTML scrape second, all-empty last.

use reqwest::Client;
use scraper::{Html, Selector};

use crate::feed;
use crate::ArticleMetadata;

/// Resolve `{title, excerpt, image}` for a URL.
///
/// The body is fetched once and interpreted both ways: if it parses as a
/// feed with at least one entry, the first entry wins; otherwise the body is
/// scanned as HTML for Open-Graph and standard metadata tags. Transport
/// failures and unextractable documents degrade to empty fields.
pub async fn resolve(client: &Client, url: &str) -> ArticleMetadata {
    let body = match fetch(client, url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::debug!("metadata fetch failed for {}: {}", url, e);
            return ArticleMetadata::default();
        }
    };

    if let Ok(entries) = feed::parse_feed(&body) {
        if let Some(entry) = entries.into_iter().next() {
            return ArticleMetadata {
                title: entry.title,
                excerpt: entry.snippet,
                image: entry.enclosure,
            };
        }
    }

    extract_from_html(&body)
}

async fn fetch(client: &Client, url: &str) -> reqwest::Result<String> {
    // Error pages carry markup too; a non-2xx body must not leak into the
    // poster, so status failures degrade like transport failures
    client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await
}

/// Scan markup for shareable metadata: `og:title` else `<title>`,
/// `og:description` else the description meta, `og:image`. Each extraction
/// is independent; misses default to empty.
pub(crate) fn extract_from_html(html: &str) -> ArticleMetadata {
    let document = Html::parse_document(html);

    let og_title = Selector::parse(r#"meta[property="og:title"]"#).unwrap();
    let plain_title = Selector::parse("title").unwrap();
    let og_description = Selector::parse(r#"meta[property="og:description"]"#).unwrap();
    let plain_description = Selector::parse(r#"meta[name="description"]"#).unwrap();
    let og_image = Selector::parse(r#"meta[property="og:image"]"#).unwrap();

    let meta_content = |sel: &Selector| {
        document
            .select(sel)
            .next()
            .and_then(|el| el.value().attr("content"))
            .map(str::to_string)
    };

    let title = meta_content(&og_title)
        .or_else(|| {
            document
                .select(&plain_title)
                .next()
                .map(|el| el.text().collect::<String>())
        })
        .unwrap_or_default();

    let excerpt = meta_content(&og_description)
        .or_else(|| meta_content(&plain_description))
        .unwrap_or_default();

    let image = meta_content(&og_image).unwrap_or_default();

    ArticleMetadata {
        title,
        excerpt,
        image,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_og_title_takes_priority_over_title_element() {
        let html = r#"<html><head>
            <title>Plain Title</title>
            <meta property="og:title" content="OG Title">
        </head><body></body></html>"#;
        let meta = extract_from_html(html);
        assert_eq!(meta.title, "OG Title");
    }

    #[test]
    fn test_falls_back_to_title_element() {
        let html = "<html><head><title>Plain Title</title></head><body></body></html>";
        let meta = extract_from_html(html);
        assert_eq!(meta.title, "Plain Title");
    }

    #[test]
    fn test_description_fallback_order() {
        let html = r#"<html><head>
            <meta name="description" content="plain desc">
        </head></html>"#;
        assert_eq!(extract_from_html(html).excerpt, "plain desc");

        let html = r#"<html><head>
            <meta property="og:description" content="og desc">
            <meta name="description" content="plain desc">
        </head></html>"#;
        assert_eq!(extract_from_html(html).excerpt, "og desc");
    }

    #[test]
    fn test_og_image_extraction() {
        let html = r#"<html><head>
            <meta property="og:image" content="https://example.com/cover.jpg">
        </head></html>"#;
        assert_eq!(extract_from_html(html).image, "https://example.com/cover.jpg");
    }

    #[test]
    fn test_unextractable_markup_yields_all_empty() {
        let meta = extract_from_html("not really markup at all");
        assert_eq!(meta, ArticleMetadata::default());
    }
}
