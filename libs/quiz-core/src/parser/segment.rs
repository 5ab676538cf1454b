//! Splits a rendered document into per-question fragments.

use crate::html::Node;
use regex::Regex;
use std::sync::OnceLock;

/// One question's heading data plus the sibling nodes that follow it.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub number: u32,
    pub title: String,
    pub body: Vec<Node>,
}

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\d+").expect("valid number pattern"))
}

/// Partition top-level nodes on headings of the given level.
///
/// Content before the first heading belongs to no question. Headings without
/// a number cannot be identified and are dropped together with their body.
pub fn segment(nodes: Vec<Node>, heading_level: u8) -> Vec<Segment> {
    let heading_tag = format!("h{}", heading_level);
    let mut segments = Vec::new();
    let mut current: Option<Segment> = None;
    let mut skipping = false;

    for node in nodes {
        if node.is_element(&heading_tag) {
            segments.extend(current.take());
            let text = node.text_content();
            match parse_heading(&text) {
                Some((number, title)) => {
                    current = Some(Segment {
                        number,
                        title,
                        body: Vec::new(),
                    });
                    skipping = false;
                }
                None => {
                    tracing::warn!(heading = %text.trim(), "skipping question heading without a number");
                    skipping = true;
                }
            }
            continue;
        }

        if skipping {
            continue;
        }
        if let Some(segment) = current.as_mut() {
            segment.body.push(node);
        }
    }

    segments.extend(current);
    segments
}

/// Extract the question number and title from heading text.
///
/// The number is the first run of digits anywhere in the text; the title is
/// the text without its first whitespace-separated token.
pub fn parse_heading(text: &str) -> Option<(u32, String)> {
    let number = number_pattern().find(text)?.as_str().parse().ok()?;
    let title = text.split_whitespace().skip(1).collect::<Vec<_>>().join(" ");
    Some((number, title))
}
