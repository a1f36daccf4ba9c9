//! Poster HTML construction.
//!
//! Plain string templating: a fixed layout with token substitution, no
//! template engine. Every externally-derived string is HTML-escaped before
//! embedding; that is the only injection defense this document gets.

use url::Url;

use crate::{ArticleMetadata, Error, PosterSize, Result, Template};

/// Marker text rendered in place of the hero image when none was resolved.
/// Tests assert on its presence, keep it stable.
pub const NO_IMAGE_MARKER: &str = "No image";

const TITLE_PLACEHOLDER: &str = "Untitled";
const EXCERPT_PLACEHOLDER: &str = "No summary available.";

// The document skeleton. Tokens are substituted with `str::replace` so the
// CSS braces do not need `format!` escaping.
const POSTER_SKELETON: &str = r#"<!doctype html>
<html>
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <style>
    @font-face { font-family: 'InterVar'; src: local('Arial'); }
    body { margin:0; font-family: InterVar, Arial, sans-serif; }
    .canvas { width:{{WIDTH}}px; height:{{HEIGHT}}px; display:flex; flex-direction:column; background:{{CANVAS_BG}}; }
    .hero { flex: 1 0 auto; position:relative; }
    .hero img { width:100%; height:100%; object-fit:cover; filter: brightness({{HERO_BRIGHTNESS}}); }
    .overlay { position:absolute; inset:0; display:flex; align-items:flex-end; padding:40px; }
    .title { color:{{TITLE_COLOR}}; font-size:56px; line-height:1.05; font-weight:700; text-shadow: {{TITLE_SHADOW}}; }
    .meta { padding:28px; font-size:20px; color:{{META_COLOR}}; }
    .source { font-size:14px; color:{{SOURCE_COLOR}}; margin-top:12px; }
    .branding { position:absolute; right:20px; top:20px; background:{{BADGE_BG}}; color:{{BADGE_COLOR}}; padding:8px 12px; border-radius:8px; font-size:14px; }
  </style>
</head>
<body>
<div class="canvas">
  <div class="hero">
    {{HERO}}
    <div class="overlay">
      <div>
        <div class="title">{{TITLE}}</div>
      </div>
      <div class="branding">Source: {{HOSTNAME}}</div>
    </div>
  </div>
  <div class="meta">
    <div>{{EXCERPT}}</div>
    <div class="source">Read more: {{SOURCE}}</div>
  </div>
</div>
</body>
</html>
"#;

struct Palette {
    canvas_bg: &'static str,
    hero_brightness: &'static str,
    title_color: &'static str,
    title_shadow: &'static str,
    meta_color: &'static str,
    source_color: &'static str,
    badge_bg: &'static str,
    badge_color: &'static str,
}

impl Palette {
    fn for_template(template: Template) -> Self {
        match template {
            Template::Bold => Palette {
                canvas_bg: "#fff",
                hero_brightness: "0.6",
                title_color: "#fff",
                title_shadow: "0 6px 18px rgba(0,0,0,0.45)",
                meta_color: "#333",
                source_color: "#666",
                badge_bg: "rgba(0,0,0,0.4)",
                badge_color: "#fff",
            },
            Template::Clean => Palette {
                canvas_bg: "#fafafa",
                hero_brightness: "0.85",
                title_color: "#fff",
                title_shadow: "0 2px 8px rgba(0,0,0,0.6)",
                meta_color: "#222",
                source_color: "#999",
                badge_bg: "rgba(255,255,255,0.75)",
                badge_color: "#222",
            },
        }
    }
}

/// Escape a string for embedding in markup.
///
/// The four substitutions (`&`, `<`, `>`, `"`) in this order; `&` must come
/// first so already-produced entities are not double-mangled.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Build the poster document for a metadata triple.
///
/// Fails only when the source URL cannot be parsed for hostname extraction;
/// missing metadata fields render placeholders instead.
pub fn build_poster_html(
    meta: &ArticleMetadata,
    source_url: &str,
    template: Template,
    size: PosterSize,
) -> Result<String> {
    let hostname = Url::parse(source_url)
        .map_err(|e| Error::InvalidUrl(format!("{}: {}", source_url, e)))?
        .host_str()
        .unwrap_or_default()
        .to_string();

    let title = if meta.title.is_empty() {
        TITLE_PLACEHOLDER.to_string()
    } else {
        escape_html(&meta.title)
    };
    let excerpt = if meta.excerpt.is_empty() {
        EXCERPT_PLACEHOLDER.to_string()
    } else {
        escape_html(&meta.excerpt)
    };

    let hero = if meta.image.is_empty() {
        format!(
            r#"<div style="width:100%;height:100%;background:#ddd;display:flex;align-items:center;justify-content:center;color:#666;">{}</div>"#,
            NO_IMAGE_MARKER
        )
    } else {
        format!(r#"<img src="{}" />"#, escape_html(&meta.image))
    };

    let palette = Palette::for_template(template);

    Ok(POSTER_SKELETON
        .replace("{{WIDTH}}", &size.width.to_string())
        .replace("{{HEIGHT}}", &size.height.to_string())
        .replace("{{CANVAS_BG}}", palette.canvas_bg)
        .replace("{{HERO_BRIGHTNESS}}", palette.hero_brightness)
        .replace("{{TITLE_COLOR}}", palette.title_color)
        .replace("{{TITLE_SHADOW}}", palette.title_shadow)
        .replace("{{META_COLOR}}", palette.meta_color)
        .replace("{{SOURCE_COLOR}}", palette.source_color)
        .replace("{{BADGE_BG}}", palette.badge_bg)
        .replace("{{BADGE_COLOR}}", palette.badge_color)
        .replace("{{HERO}}", &hero)
        .replace("{{TITLE}}", &title)
        .replace("{{HOSTNAME}}", &escape_html(&hostname))
        .replace("{{EXCERPT}}", &excerpt)
        .replace("{{SOURCE}}", &escape_html(source_url)))
}
