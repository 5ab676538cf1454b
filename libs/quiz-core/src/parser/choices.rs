//! Answer-choice list detection.
//!
//! Walks a question's sibling nodes with a small state machine. The first
//! unordered list becomes the answer-choice list; later lists in the same
//! fragment are merged into it so that only one list start and one list end
//! remain, and everything between them moves inside the list.

use crate::html::{self, Element, Node};

pub const CHOICE_LIST_CLASS: &str = "list-group";
pub const CHOICE_LIST_ID: &str = "answer_choices";
pub const CHOICE_ITEM_CLASS: &str = "my-1 list-group-item";

/// A question fragment split around its answer-choice list.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceFragment {
    /// Nodes before the list.
    pub prompt: Vec<Node>,
    pub choice_list: Option<Element>,
    /// Nodes after the list.
    pub trailing: Vec<Node>,
    pub correct_choice: Option<usize>,
    pub choice_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    SeekingList,
    InList,
    AfterList,
}

/// Scan a fragment's sibling nodes for the answer-choice list.
///
/// Top-level anchors are dropped. When several items carry the marker, the
/// last one wins.
pub fn extract(body: Vec<Node>, marker: &str) -> ChoiceFragment {
    let last_list = body.iter().rposition(|node| node.is_element("ul"));
    let mut scanner = Scanner::new(marker);
    let mut state = ScanState::SeekingList;

    for (idx, node) in body.into_iter().enumerate() {
        if node.is_element("a") {
            continue;
        }
        let Some(node) = trim_text(node) else {
            continue;
        };
        let closes_list = Some(idx) == last_list;

        state = match (state, node) {
            (ScanState::SeekingList, Node::Element(el)) if el.is("ul") => {
                scanner.open_list(el);
                if closes_list { ScanState::AfterList } else { ScanState::InList }
            }
            (ScanState::SeekingList, node) => {
                scanner.prompt.push(node);
                ScanState::SeekingList
            }
            (ScanState::InList, Node::Element(el)) if el.is("ul") => {
                scanner.merge_list(el);
                if closes_list { ScanState::AfterList } else { ScanState::InList }
            }
            (ScanState::InList, node) => {
                scanner.push_into_list(node);
                ScanState::InList
            }
            (ScanState::AfterList, node) => {
                scanner.trailing.push(node);
                ScanState::AfterList
            }
        };
    }

    scanner.finish()
}

struct Scanner<'a> {
    marker: &'a str,
    prompt: Vec<Node>,
    list: Option<Element>,
    trailing: Vec<Node>,
    correct_choice: Option<usize>,
    next_index: usize,
}

impl<'a> Scanner<'a> {
    fn new(marker: &'a str) -> Self {
        Self {
            marker,
            prompt: Vec::new(),
            list: None,
            trailing: Vec::new(),
            correct_choice: None,
            next_index: 0,
        }
    }

    fn open_list(&mut self, list: Element) {
        let mut styled = Element::new("ul")
            .with_attr("class", CHOICE_LIST_CLASS)
            .with_attr("id", CHOICE_LIST_ID);
        for (name, value) in list.attrs {
            if name != "class" && name != "id" {
                styled.set_attr(&name, value);
            }
        }
        self.list = Some(styled);
        self.absorb_items(list.children);
    }

    fn merge_list(&mut self, list: Element) {
        self.absorb_items(list.children);
    }

    fn push_into_list(&mut self, node: Node) {
        if let Some(list) = self.list.as_mut() {
            list.children.push(node);
        }
    }

    fn absorb_items(&mut self, children: Vec<Node>) {
        for child in children {
            match child {
                Node::Element(item) if item.is("li") => {
                    let styled = self.style_item(item);
                    self.push_into_list(styled.into());
                }
                other => self.push_into_list(other),
            }
        }
    }

    fn style_item(&mut self, mut item: Element) -> Element {
        let index = self.next_index;
        self.next_index += 1;

        let text = item.block_text();
        let text = text.trim_start();
        if text.starts_with(self.marker) {
            self.correct_choice = Some(index);
        }

        item.set_attr("onclick", format!("checkAnswer({})", index));
        item.set_attr("class", CHOICE_ITEM_CLASS);
        item.children = vec![Node::text(strip_marker(text, self.marker))];
        item
    }

    fn finish(mut self) -> ChoiceFragment {
        // A code sample right after the list belongs to the list.
        if let Some(list) = self.list.as_mut() {
            if self.trailing.first().map_or(false, |node| node.is_element("pre")) {
                list.children.push(self.trailing.remove(0));
            }
        }

        html::wrap_bare_code(&mut self.prompt);
        if let Some(list) = self.list.as_mut() {
            html::wrap_bare_code(&mut list.children);
        }
        html::wrap_bare_code(&mut self.trailing);

        ChoiceFragment {
            prompt: self.prompt,
            choice_list: self.list,
            trailing: self.trailing,
            correct_choice: self.correct_choice,
            choice_count: self.next_index,
        }
    }
}

/// Drop the leading marker token (`[x] ` or `[ ] `) from a choice's text.
fn strip_marker(text: &str, marker: &str) -> String {
    let token_len = marker.chars().count() + 1;
    text.chars().skip(token_len).collect::<String>().trim().to_string()
}

/// Trim top-level text nodes, discarding those left empty.
fn trim_text(node: Node) -> Option<Node> {
    match node {
        Node::Text(text) => {
            let trimmed = text.trim();
            (!trimmed.is_empty()).then(|| Node::text(trimmed))
        }
        Node::Raw(html) => {
            let trimmed = html.trim();
            (!trimmed.is_empty()).then(|| Node::Raw(trimmed.to_string()))
        }
        other => Some(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::render;
    use crate::markup::render_markdown;
    use pretty_assertions::assert_eq;

    fn extract_md(md: &str) -> ChoiceFragment {
        extract(render_markdown(md), "[x]")
    }

    #[test]
    fn styles_list_and_detects_marker() {
        let fragment = extract_md("Pick one\n\n- [ ] 3\n- [x] 4\n- [ ] 5");
        assert_eq!(fragment.correct_choice, Some(1));
        assert_eq!(fragment.choice_count, 3);
        assert_eq!(
            Node::from(fragment.choice_list.unwrap()).to_html(),
            "<ul class=\"list-group\" id=\"answer_choices\">\
             <li onclick=\"checkAnswer(0)\" class=\"my-1 list-group-item\">3</li>\
             <li onclick=\"checkAnswer(1)\" class=\"my-1 list-group-item\">4</li>\
             <li onclick=\"checkAnswer(2)\" class=\"my-1 list-group-item\">5</li></ul>"
        );
        assert_eq!(render(&fragment.prompt), "<p>Pick one</p>");
    }

    #[test]
    fn last_marker_wins() {
        let fragment = extract_md("- [x] a\n- [ ] b\n- [x] c");
        assert_eq!(fragment.correct_choice, Some(2));
    }

    #[test]
    fn no_marker_no_correct_choice() {
        let fragment = extract_md("- [ ] a\n- [ ] b");
        assert_eq!(fragment.correct_choice, None);
        assert_eq!(fragment.choice_count, 2);
    }

    #[test]
    fn choice_text_never_keeps_marker() {
        let fragment = extract_md("- [x] yes\n- [ ] no");
        let list = fragment.choice_list.unwrap();
        for item in list.children.iter().filter_map(Node::as_element) {
            let text = item.text_content();
            assert!(!text.starts_with("[x]"), "{}", text);
            assert!(!text.starts_with("[ ]"), "{}", text);
        }
    }

    #[test]
    fn nested_sub_list_is_flattened_with_a_space() {
        let fragment = extract_md("- [x] a\n  - sub\n- [ ] b");
        assert_eq!(fragment.correct_choice, Some(0));
        let list = fragment.choice_list.unwrap();
        let texts: Vec<String> = list
            .children
            .iter()
            .filter_map(Node::as_element)
            .map(Element::text_content)
            .collect();
        assert_eq!(texts, vec!["a sub", "b"]);
    }

    #[test]
    fn html_block_in_prompt_keeps_its_lines() {
        let fragment = extract_md("Output?\n\n<pre>\nfor x in y:\n    print(x)\n</pre>\n\n- [x] a");
        assert_eq!(
            render(&fragment.prompt),
            "<p>Output?</p><pre>\nfor x in y:\n    print(x)\n</pre>"
        );
    }

    #[test]
    fn no_list_keeps_everything_in_prompt() {
        let fragment = extract_md("just text\n\nmore text");
        assert!(fragment.choice_list.is_none());
        assert_eq!(fragment.prompt.len(), 2);
        assert!(fragment.trailing.is_empty());
    }

    #[test]
    fn top_level_anchor_text_is_dropped() {
        let mut body = render_markdown("- [x] a");
        body.insert(0, Element::new("a").with_attr("href", "#top").into());
        let fragment = extract(body, "[x]");
        assert!(fragment.prompt.is_empty());
        assert_eq!(fragment.correct_choice, Some(0));
    }

    #[test]
    fn later_lists_merge_into_choice_list() {
        let fragment = extract_md("- [ ] a\n- [ ] b\n\n```\n- [x] c\n```\n\n* [x] d\n\nafter");
        let list = fragment.choice_list.unwrap();
        let items: Vec<_> = list
            .children
            .iter()
            .filter(|node| node.is_element("li"))
            .collect();
        assert_eq!(items.len(), 3);
        assert_eq!(fragment.correct_choice, Some(2));
        assert!(list.children.iter().any(|node| node.is_element("pre")));
        let html = Node::from(list).to_html();
        assert_eq!(html.matches("<ul").count(), 1);
        assert_eq!(html.matches("</ul>").count(), 1);
        assert_eq!(render(&fragment.trailing), "<p>after</p>");
    }

    #[test]
    fn code_block_after_list_moves_inside() {
        let fragment = extract_md("- [x] a\n- [ ] b\n\n```js\nlet x;\n```\n\nwhy");
        let html = Node::from(fragment.choice_list.unwrap()).to_html();
        assert!(html.ends_with("<pre><code class=\"language-js\">let x;\n</code></pre></ul>"));
        assert_eq!(render(&fragment.trailing), "<p>why</p>");
    }

    #[test]
    fn inline_code_is_wrapped_in_pre() {
        let fragment = extract_md("What does `ls` do?\n\n- [x] lists");
        assert_eq!(
            render(&fragment.prompt),
            "<p>What does <pre><code>ls</code></pre> do?</p>"
        );
    }
}
