//! Poster rendering orchestration.
//!
//! A strictly linear pipeline: build the HTML document, rasterize it on a
//! dedicated worker thread owning a fresh [`RasterEngine`], persist the PNG
//! to a temp artifact. The worker thread pattern keeps the synchronous CDP
//! engine off the async runtime; replies come back over a oneshot channel.

use tokio::sync::oneshot;

use crate::artifact::PosterArtifact;
use crate::raster::RasterEngine;
use crate::template::build_poster_html;
use crate::{ArticleMetadata, Error, PosterSize, RasterConfig, Result, Template};

/// Render a poster PNG for resolved article metadata.
///
/// Template construction and rasterization failures are fatal; there is no
/// placeholder for "could not produce an image". The engine instance is
/// released whether or not rendering succeeds.
pub async fn render_poster(
    meta: &ArticleMetadata,
    source_url: &str,
    template: Template,
    size: PosterSize,
    config: RasterConfig,
) -> Result<PosterArtifact> {
    let html = build_poster_html(meta, source_url, template, size)?;

    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let _ = tx.send(rasterize_blocking(&html, config));
    });

    let png = rx
        .await
        .map_err(|_| Error::Render("Rasterizer worker exited before replying".into()))??;

    PosterArtifact::from_png_bytes(&png).await
}

/// Launch, load, capture, close, all on the calling (worker) thread.
///
/// The engine is closed on both the success and the failure path once it
/// has launched; a launch failure has nothing to release.
fn rasterize_blocking(html: &str, config: RasterConfig) -> Result<Vec<u8>> {
    let mut engine = RasterEngine::new(config)?;

    let captured = match engine.load_html(html) {
        Ok(()) => engine.capture_png(),
        Err(e) => Err(e),
    };

    let closed = engine.close();

    let png = captured?;
    closed?;
    Ok(png)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_source_url_fails_before_rasterization() {
        let result = render_poster(
            &ArticleMetadata::default(),
            "definitely not a url",
            Template::Bold,
            PosterSize::default(),
            RasterConfig::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[tokio::test]
    #[ignore] // Requires Chrome to be installed
    async fn test_render_poster_produces_png_artifact() {
        let size = PosterSize {
            width: 640,
            height: 480,
        };
        let config = RasterConfig {
            viewport: size,
            ..Default::default()
        };
        let artifact = render_poster(
            &ArticleMetadata {
                title: "Hello".into(),
                excerpt: "World".into(),
                image: String::new(),
            },
            "https://example.com/post",
            Template::Bold,
            size,
            config,
        )
        .await
        .expect("render failed");

        let png = tokio::fs::read(artifact.path()).await.unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
