//! Posterforge
//!
//! A small HTTP service that turns an article URL into a fixed-layout PNG
//! poster. Metadata (title, excerpt, hero image) is resolved best-effort
//! (RSS/Atom feed first, Open-Graph/HTML scrape second) and the poster is
//! rasterized by a fresh headless-Chrome instance per request.
//!
//! # Example
//!
//! ```no_run
//! use posterforge::{metadata, poster, PosterSize, RasterConfig, Template};
//!
//! # #[tokio::main]
//! # async fn main() -> posterforge::Result<()> {
//! let client = reqwest::Client::new();
//! let meta = metadata::resolve(&client, "https://example.com/article").await;
//!
//! let size = PosterSize::default();
//! let config = RasterConfig { viewport: size, ..Default::default() };
//! let artifact =
//!     poster::render_poster(&meta, "https://example.com/article", Template::Bold, size, config)
//!         .await?;
//! println!("poster written to {}", artifact.path().display());
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod artifact;
pub mod feed;
pub mod metadata;
pub mod poster;
pub mod raster;
pub mod server;
pub mod template;

pub use artifact::PosterArtifact;

/// Best-effort metadata for a web article.
///
/// Every field is always present; resolution failures degrade to empty
/// strings rather than absent values, so downstream rendering never has to
/// null-check. Constructed fresh per request and never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleMetadata {
    /// Article title (feed entry title or `og:title`/`<title>`)
    pub title: String,
    /// Short summary (feed entry snippet or `og:description`/description meta)
    pub excerpt: String,
    /// Hero image URL; empty when none was resolved
    pub image: String,
}

/// Visual template for the poster layout.
///
/// Both templates share the same structure (full-bleed hero with overlaid
/// title and source badge, metadata panel below); they differ in palette.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    #[default]
    Bold,
    Clean,
}

/// Output dimensions of the poster in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterSize {
    pub width: u32,
    pub height: u32,
}

impl Default for PosterSize {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 1600,
        }
    }
}

/// Configuration for the rasterization engine
///
/// The viewport fixes the output pixel size of the capture; the timeout
/// bounds navigation and script evaluation inside the engine.
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Output viewport; the captured PNG is clipped to exactly this rectangle
    pub viewport: PosterSize,
    /// Timeout for page loads and evaluations in milliseconds
    pub timeout_ms: u64,
    /// User agent string the engine sends with resource requests
    pub user_agent: String,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            viewport: PosterSize::default(),
            timeout_ms: 30000,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Posterforge/0.1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_size() {
        let size = PosterSize::default();
        assert_eq!(size.width, 1200);
        assert_eq!(size.height, 1600);
    }

    #[test]
    fn test_default_template_is_bold() {
        assert_eq!(Template::default(), Template::Bold);
    }

    #[test]
    fn test_template_serde_lowercase() {
        let t: Template = serde_json::from_str("\"clean\"").unwrap();
        assert_eq!(t, Template::Clean);
        assert_eq!(serde_json::to_string(&Template::Bold).unwrap(), "\"bold\"");
    }

    #[test]
    fn test_metadata_default_is_all_empty() {
        let meta = ArticleMetadata::default();
        assert!(meta.title.is_empty());
        assert!(meta.excerpt.is_empty());
        assert!(meta.image.is_empty());
    }
}
