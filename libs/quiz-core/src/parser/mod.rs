//! Markdown quiz parser.
//!
//! # Format
//! ```markdown
//! #### Q1. Which keyword declares a constant?
//!
//! - [ ] let
//! - [x] const
//! - [ ] static mut
//!
//! **Explanation:** `const` items are inlined at each use.
//!
//! [Reference](https://doc.rust-lang.org/std/keyword.const.html)
//! ```
//!
//! Each heading opens a question. The first unordered list holds the answer
//! choices and the item starting with `[x]` is the correct one. Anything after
//! the list is an optional explanation.

pub mod choices;
pub mod explanation;
pub mod segment;

use crate::html::{self, Node};
use crate::markup;
use crate::types::{ParsedQuestion, ParserConfig};

/// Parse a topic's markdown into questions.
///
/// Questions without a detectable correct choice are returned with
/// `correct_choice: None`; filtering them is left to the record builder.
pub fn parse(markdown: &str, topic: &str, config: &ParserConfig) -> Vec<ParsedQuestion> {
    let document = markup::normalize(markdown, topic, config);
    segment::segment(document, config.heading_level)
        .into_iter()
        .map(|segment| assemble(segment, &config.correct_marker))
        .collect()
}

fn assemble(segment: segment::Segment, marker: &str) -> ParsedQuestion {
    let fragment = choices::extract(segment.body, marker);
    let correct_choice = fragment.correct_choice;
    let split = explanation::split(fragment);

    let mut content = Vec::with_capacity(split.content.len() + 1);
    content.push(Node::text(segment.title.as_str()));
    content.extend(split.content);

    ParsedQuestion {
        number: segment.number,
        title: segment.title,
        content_html: html::render(&content),
        explanation_html: split.explanation.map(|nodes| html::render(&nodes)),
        correct_choice,
    }
}
