use regex::Regex;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::models::{Entry, ExtractStats};
use crate::error::PipelineError;

/// Turns the article HTML into entries tagged with section and year.
pub struct Extractor {
    year_min: u16,
    year_max: u16,
    body_re: Regex,
    div_re: Regex,
    noise_re: Regex,
    tag_re: Regex,
    heading_close_re: Regex,
    markup_re: Regex,
    entity_re: Regex,
    edit_re: Regex,
    year_re: Regex,
    paren_re: Regex,
}

struct OpenItem {
    start: usize,
    content_start: usize,
    section: String,
    close: Option<(usize, usize)>,
}

impl Extractor {
    pub fn new(year_min: u16, year_max: u16) -> anyhow::Result<Self> {
        Ok(Self {
            year_min,
            year_max,
            body_re: Regex::new(r#"(?i)<div\b[^>]*\bclass\s*=\s*"[^"]*\bmw-parser-output\b[^"]*"[^>]*>"#)?,
            div_re: Regex::new(r"(?i)<(/?)div\b[^>]*>")?,
            // Inline styles, scripts and citation markers never carry entry text
            noise_re: Regex::new(
                r#"(?is)<style\b[^>]*>.*?</style\s*>|<script\b[^>]*>.*?</script\s*>|<sup\b[^>]*\bclass\s*=\s*"[^"]*\breference\b[^"]*"[^>]*>.*?</sup\s*>"#,
            )?,
            tag_re: Regex::new(r"(?i)<(/?)(h[234]|li)\b[^>]*>")?,
            heading_close_re: Regex::new(r"(?i)</h[234]\s*>")?,
            markup_re: Regex::new(r"<[^>]*>")?,
            entity_re: Regex::new(r"&(#[xX][0-9a-fA-F]+|#[0-9]+|[a-zA-Z]+);")?,
            edit_re: Regex::new(r"(?i)\[\s*edit\s*\]")?,
            year_re: Regex::new(r"\b(19\d{2}|20\d{2})\b")?,
            paren_re: Regex::new(r"\(([^()]*)\)")?,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Self::new(config.year_min, config.year_max)
    }

    pub fn extract(&self, html: &str) -> Result<(Vec<Entry>, ExtractStats), PipelineError> {
        let Some(marker) = self.body_re.find(html) else {
            return Err(PipelineError::Parse {
                msg: "could not find the mw-parser-output content wrapper".to_string(),
            });
        };
        let wrapper_end = self.wrapper_end(html, marker.end());
        let body = self.noise_re.replace_all(&html[marker.end()..wrapper_end], " ");
        let body: &str = &body;

        let mut items: Vec<OpenItem> = Vec::new();
        let mut open_stack: Vec<usize> = Vec::new();
        let mut headings: Vec<(u8, String)> = Vec::new();

        for caps in self.tag_re.captures_iter(body) {
            let Some(tag) = caps.get(0) else { continue };
            let closing = !caps[1].is_empty();
            let name = caps[2].to_ascii_lowercase();

            match (name.as_str(), closing) {
                ("li", false) => {
                    open_stack.push(items.len());
                    items.push(OpenItem {
                        start: tag.start(),
                        content_start: tag.end(),
                        section: section_label(&headings),
                        close: None,
                    });
                }
                ("li", true) => {
                    if let Some(idx) = open_stack.pop() {
                        items[idx].close = Some((tag.start(), tag.end()));
                    }
                }
                (heading, false) => {
                    let level = heading.as_bytes()[1] - b'0';
                    let inner_end = self
                        .heading_close_re
                        .find_at(body, tag.end())
                        .map(|m| m.start())
                        .unwrap_or(tag.end());
                    let text = self.clean_text(&body[tag.end()..inner_end]);
                    let title = self.edit_re.replace_all(&text, "").trim().to_string();

                    headings.retain(|(l, _)| *l < level);
                    if !title.is_empty() {
                        headings.push((level, title));
                    }
                }
                (_, true) => {}
            }
        }

        // An unterminated item runs to the end of the body
        let spans: Vec<(usize, usize, usize)> = items
            .iter()
            .map(|item| {
                let (content_end, raw_end) = item.close.unwrap_or((body.len(), body.len()));
                (item.start, content_end, raw_end)
            })
            .collect();

        let mut entries = Vec::new();
        let mut stats = ExtractStats::default();
        for (idx, item) in items.into_iter().enumerate() {
            let (_, content_end, raw_end) = spans[idx];
            let text = self.clean_text(&body[item.content_start..content_end]);
            if text.is_empty() {
                continue;
            }

            stats.scanned += 1;
            // Nested items are entries of their own; a container's year
            // comes only from its own text.
            let own_html = own_content(body, item.content_start, content_end, &spans[idx + 1..]);
            let year = self.extract_year(&self.clean_text(&own_html));
            match year {
                Some(_) => stats.with_year += 1,
                None => {
                    stats.without_year += 1;
                    debug!("No year found in entry: {text}");
                }
            }

            entries.push(Entry {
                text,
                year,
                section: item.section,
                raw: body[item.start..raw_end].to_string(),
            });
        }

        if entries.is_empty() {
            return Err(PipelineError::Parse {
                msg: "no list entries found in the article body".to_string(),
            });
        }

        info!(
            "Scanned {} list items ({} with a year, {} without)",
            stats.scanned, stats.with_year, stats.without_year
        );
        Ok((entries, stats))
    }

    /// Byte offset where the wrapper opened at `content_start` closes.
    fn wrapper_end(&self, html: &str, content_start: usize) -> usize {
        let mut depth = 1usize;
        for caps in self.div_re.captures_iter(&html[content_start..]) {
            let Some(tag) = caps.get(0) else { continue };
            if !caps[1].is_empty() {
                depth -= 1;
                if depth == 0 {
                    return content_start + tag.start();
                }
            } else if !tag.as_str().ends_with("/>") {
                depth += 1;
            }
        }
        html.len()
    }

    /// Prefer a year inside a parenthetical (usually the air date), then
    /// any year in the text. Years outside the configured range are ignored.
    pub fn extract_year(&self, text: &str) -> Option<u16> {
        self.paren_re
            .captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .find_map(|inner| self.first_year(inner.as_str()))
            .or_else(|| self.first_year(text))
    }

    fn first_year(&self, text: &str) -> Option<u16> {
        self.year_re
            .find_iter(text)
            .filter_map(|m| m.as_str().parse::<u16>().ok())
            .find(|year| (self.year_min..=self.year_max).contains(year))
    }

    fn clean_text(&self, html: &str) -> String {
        let stripped = self.markup_re.replace_all(html, " ");
        let decoded = self.decode_entities(&stripped);
        normalize_ws(&decoded)
    }

    fn decode_entities(&self, s: &str) -> String {
        self.entity_re
            .replace_all(s, |caps: &regex::Captures| {
                let name = &caps[1];
                let decoded = if let Some(hex) = name
                    .strip_prefix("#x")
                    .or_else(|| name.strip_prefix("#X"))
                {
                    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
                } else if let Some(dec) = name.strip_prefix('#') {
                    dec.parse::<u32>().ok().and_then(char::from_u32)
                } else {
                    named_entity(name)
                };
                match decoded {
                    Some(c) => c.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

fn named_entity(name: &str) -> Option<char> {
    Some(match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        "lsquo" => '\u{2018}',
        "rsquo" => '\u{2019}',
        "ldquo" => '\u{201C}',
        "rdquo" => '\u{201D}',
        "hellip" => '\u{2026}',
        _ => return None,
    })
}

/// `body[start..end]` with the spans of later (nested) items cut out.
/// `later` holds `(start, content_end, raw_end)` in document order.
fn own_content(body: &str, start: usize, end: usize, later: &[(usize, usize, usize)]) -> String {
    let mut own = String::new();
    let mut cursor = start;
    for &(child_start, _, child_end) in later {
        if child_start >= end {
            break;
        }
        if child_start < cursor {
            continue;
        }
        own.push_str(&body[cursor..child_start]);
        own.push(' ');
        cursor = child_end.min(end);
    }
    own.push_str(&body[cursor..end]);
    own
}

fn section_label(headings: &[(u8, String)]) -> String {
    headings
        .iter()
        .map(|(_, title)| title.as_str())
        .collect::<Vec<_>>()
        .join(" > ")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
