//! RSS/Atom feed entry extraction.
//!
//! Event-driven parse of a syndication document. Only the fields the poster
//! needs are pulled out of each entry: title, a plain-text snippet of the
//! description/summary, and an enclosure image URL.

use quick_xml::events::Event;
use quick_xml::reader::Reader;
use thiserror::Error;

/// Errors produced while interpreting a document as a feed
#[derive(Error, Debug)]
pub enum FeedError {
    /// The document root is not a recognized feed element
    #[error("not a feed document")]
    NotAFeed,

    /// The document is not well-formed XML
    #[error("XML parse error: {0}")]
    Parse(String),
}

/// A single feed entry reduced to the fields a poster uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    pub title: String,
    /// Entry description/summary with markup stripped and whitespace collapsed
    pub snippet: String,
    /// Enclosure/media URL; empty when the entry carries none
    pub enclosure: String,
}

/// Parse a feed document into its entries.
///
/// Accepts RSS (`<rss>`/`<rdf:RDF>` roots, `<item>` entries) and Atom
/// (`<feed>` root, `<entry>` entries). Any other root element or malformed
/// XML is an error, which callers treat as "this URL is not a feed".
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut root_seen = false;
    let mut current_entry: Option<FeedEntryBuilder> = None;
    let mut current_element = String::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();

                if !root_seen {
                    if !matches!(name.as_str(), "rss" | "feed" | "rdf:RDF") {
                        return Err(FeedError::NotAFeed);
                    }
                    root_seen = true;
                }

                if name == "item" || name == "entry" {
                    current_entry = Some(FeedEntryBuilder::default());
                    current_element.clear();
                } else {
                    if let Some(ref mut entry) = current_entry {
                        if name == "enclosure" || name == "link" {
                            entry.take_media_attributes(&e);
                        }
                    }
                    current_element = name;
                }
            }
            Ok(Event::Empty(e)) => {
                // Self-closing enclosure/link elements carry their payload
                // in attributes
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if let Some(ref mut entry) = current_entry {
                    if name == "enclosure" || name == "link" {
                        entry.take_media_attributes(&e);
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "item" || name == "entry" {
                    if let Some(builder) = current_entry.take() {
                        entries.push(builder.build());
                    }
                }
                current_element.clear();
            }
            Ok(Event::Text(e)) => {
                if let Some(ref mut entry) = current_entry {
                    let text = e.unescape().unwrap_or_default().to_string();
                    if !text.is_empty() {
                        entry.set_field(&current_element, text);
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(ref mut entry) = current_entry {
                    let text = String::from_utf8_lossy(&e.into_inner()).to_string();
                    if !text.is_empty() {
                        entry.set_field(&current_element, text);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(FeedError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if !root_seen {
        return Err(FeedError::NotAFeed);
    }

    Ok(entries)
}

#[derive(Default)]
struct FeedEntryBuilder {
    title: Option<String>,
    description: Option<String>,
    enclosure: Option<String>,
}

impl FeedEntryBuilder {
    fn set_field(&mut self, element: &str, text: String) {
        match element {
            "title" => self.title = Some(text),
            // RSS description, Atom summary; first one wins
            "description" | "summary" => {
                if self.description.is_none() {
                    self.description = Some(text);
                }
            }
            _ => {}
        }
    }

    /// Capture `<enclosure url=...>` (RSS) or `<link rel="enclosure" href=...>`
    /// (Atom) media attributes
    fn take_media_attributes(&mut self, e: &quick_xml::events::BytesStart<'_>) {
        let mut url = None;
        let mut href = None;
        let mut rel = None;

        for attr in e.attributes().flatten() {
            let value = attr.unescape_value().unwrap_or_default().to_string();
            match attr.key.as_ref() {
                b"url" => url = Some(value),
                b"href" => href = Some(value),
                b"rel" => rel = Some(value),
                _ => {}
            }
        }

        if self.enclosure.is_none() {
            if let Some(url) = url {
                self.enclosure = Some(url);
            } else if rel.as_deref() == Some("enclosure") {
                self.enclosure = href;
            }
        }
    }

    fn build(self) -> FeedEntry {
        FeedEntry {
            title: self.title.unwrap_or_default(),
            snippet: strip_markup(&self.description.unwrap_or_default()),
            enclosure: self.enclosure.unwrap_or_default(),
        }
    }
}

/// Reduce an HTML-bearing description to a plain-text snippet: drop tags,
/// collapse whitespace runs to single spaces, trim.
pub(crate) fn strip_markup(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(c),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}
