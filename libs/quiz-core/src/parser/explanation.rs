//! Separates trailing explanation content from the question body.

use super::choices::ChoiceFragment;
use crate::html::{self, Element, Node};

pub const EXPLANATION_BLOCK_CLASS: &str = "my-2";
pub const EXPLANATION_HEADER_ID: &str = "explanation-header";
pub const EXPLANATION_LINK_CLASS: &str = "btn btn-secondary";

/// Question body and optional explanation, both still as trees.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitQuestion {
    pub content: Vec<Node>,
    pub explanation: Option<Vec<Node>>,
}

/// Split a fragment at the end of its choice list.
///
/// Everything after the list is the explanation. Paragraph wrappers are
/// removed from the question content afterwards.
pub fn split(fragment: ChoiceFragment) -> SplitQuestion {
    let ChoiceFragment {
        mut prompt,
        choice_list,
        trailing,
        ..
    } = fragment;

    let explanation = match choice_list {
        Some(list) => {
            prompt.push(list.into());
            (!trailing.is_empty()).then(|| restyle(trailing))
        }
        None => {
            prompt.extend(trailing);
            None
        }
    };

    SplitQuestion {
        content: html::unwrap_tag(prompt, "p"),
        explanation,
    }
}

/// Restyle explanation nodes for presentation.
///
/// Paragraphs become block containers, the first bold run becomes a
/// sub-heading and links become new-tab buttons.
pub fn restyle(mut nodes: Vec<Node>) -> Vec<Node> {
    let mut header_done = false;
    html::visit_elements_mut(&mut nodes, &mut |el: &mut Element| {
        if el.is("p") {
            el.tag = "div".to_string();
            el.set_attr("class", EXPLANATION_BLOCK_CLASS);
        } else if el.is("strong") && !header_done {
            el.tag = "h5".to_string();
            el.set_attr("id", EXPLANATION_HEADER_ID);
            header_done = true;
        } else if el.is("a") {
            let mut attrs = vec![
                ("target".to_string(), "_blank".to_string()),
                ("id".to_string(), EXPLANATION_HEADER_ID.to_string()),
                ("class".to_string(), EXPLANATION_LINK_CLASS.to_string()),
            ];
            attrs.extend(
                el.attrs
                    .drain(..)
                    .filter(|(name, _)| !matches!(name.as_str(), "target" | "id" | "class")),
            );
            el.attrs = attrs;
        }
    });
    nodes
}
