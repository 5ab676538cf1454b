//! Markdown to HTML tree conversion.
//!
//! Single newlines become `<br />` line breaks and fenced code blocks are kept
//! as literal `<pre><code>` text.

use crate::html::{Element, Node};
use crate::types::ParserConfig;
use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};

/// Marker for start tags that produce no element of their own.
const TRANSPARENT: &str = "";

/// Rewrite relative `(images/...)` references to the topic's asset directory.
pub fn rewrite_image_paths(markdown: &str, topic: &str, asset_prefix: &str) -> String {
    let target = format!("({}/{}/images/", asset_prefix.trim_end_matches('/'), topic);
    markdown.replace("(images/", &target)
}

/// Normalize a topic's markdown into a sequence of top-level HTML nodes.
pub fn normalize(markdown: &str, topic: &str, config: &ParserConfig) -> Vec<Node> {
    let source = rewrite_image_paths(markdown, topic, &config.asset_prefix);
    render_markdown(&source)
}

/// Render markdown into top-level HTML nodes.
pub fn render_markdown(markdown: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::default();
    for event in Parser::new_ext(markdown, Options::empty()) {
        builder.push(event);
    }
    builder.finish()
}

#[derive(Default)]
struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Element>,
    /// Lines of the HTML block being read, emitted as one raw node.
    html_block: Option<String>,
}

impl TreeBuilder {
    fn push(&mut self, event: Event<'_>) {
        match event {
            Event::Start(Tag::HtmlBlock) => self.html_block = Some(String::new()),
            Event::End(TagEnd::HtmlBlock) => {
                if let Some(html) = self.html_block.take() {
                    self.append(Node::Raw(html));
                }
            }
            Event::Html(html) if self.html_block.is_some() => {
                if let Some(block) = self.html_block.as_mut() {
                    block.push_str(&html);
                }
            }
            Event::Start(tag) => self.start(tag),
            Event::End(TagEnd::CodeBlock) => {
                self.close(); // code
                self.close(); // pre
            }
            Event::End(_) => self.close(),
            Event::Text(text) => self.append(Node::text(text.as_ref())),
            Event::Code(text) => self.append(
                Element::new("code")
                    .with_children(vec![Node::text(text.as_ref())])
                    .into(),
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.append(Node::Raw(html.to_string())),
            Event::SoftBreak | Event::HardBreak => self.append(Element::new("br").into()),
            Event::Rule => self.append(Element::new("hr").into()),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let element = match tag {
            Tag::Paragraph => Element::new("p"),
            Tag::Heading { level, .. } => Element::new(heading_tag(level)),
            Tag::BlockQuote(_) => Element::new("blockquote"),
            Tag::CodeBlock(kind) => {
                self.open.push(Element::new("pre"));
                let code = Element::new("code");
                match kind {
                    CodeBlockKind::Fenced(info) => {
                        match info.split_whitespace().next() {
                            Some(lang) => code.with_attr("class", format!("language-{}", lang)),
                            None => code,
                        }
                    }
                    CodeBlockKind::Indented => code,
                }
            }
            Tag::List(Some(start)) if start != 1 => {
                Element::new("ol").with_attr("start", start.to_string())
            }
            Tag::List(Some(_)) => Element::new("ol"),
            Tag::List(None) => Element::new("ul"),
            Tag::Item => Element::new("li"),
            Tag::Emphasis => Element::new("em"),
            Tag::Strong => Element::new("strong"),
            Tag::Strikethrough => Element::new("del"),
            Tag::Link { dest_url, title, .. } => {
                let link = Element::new("a").with_attr("href", dest_url.as_ref());
                if title.is_empty() {
                    link
                } else {
                    link.with_attr("title", title.as_ref())
                }
            }
            Tag::Image { dest_url, title, .. } => {
                let image = Element::new("img").with_attr("src", dest_url.as_ref());
                if title.is_empty() {
                    image
                } else {
                    image.with_attr("title", title.as_ref())
                }
            }
            _ => Element::new(TRANSPARENT),
        };
        self.open.push(element);
    }

    fn close(&mut self) {
        let Some(mut element) = self.open.pop() else {
            return;
        };
        if element.is(TRANSPARENT) {
            for child in element.children {
                self.append(child);
            }
            return;
        }
        if element.is("img") {
            // Image children are its alt text.
            let alt = element.text_content();
            element.children.clear();
            element.set_attr("alt", alt);
        }
        self.append(element.into());
    }

    fn append(&mut self, node: Node) {
        let siblings = match self.open.last_mut() {
            Some(parent) => &mut parent.children,
            None => &mut self.root,
        };
        if let Node::Text(text) = &node {
            if let Some(Node::Text(previous)) = siblings.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        siblings.push(node);
    }

    fn finish(mut self) -> Vec<Node> {
        if let Some(html) = self.html_block.take() {
            self.append(Node::Raw(html));
        }
        while !self.open.is_empty() {
            self.close();
        }
        self.root
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::render;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_relative_image_paths() {
        let md = "See ![diagram](images/q1.png) and (images/q2.png)";
        assert_eq!(
            rewrite_image_paths(md, "git", "static/data/"),
            "See ![diagram](static/data/git/images/q1.png) and (static/data/git/images/q2.png)"
        );
    }

    #[test]
    fn leaves_absolute_images_alone() {
        let md = "![x](https://example.com/images/a.png)";
        assert_eq!(rewrite_image_paths(md, "git", "static/data"), md);
    }

    #[test]
    fn single_newline_becomes_line_break() {
        let html = render(&render_markdown("first\nsecond"));
        assert_eq!(html, "<p>first<br />second</p>");
    }

    #[test]
    fn fenced_code_is_literal() {
        let html = render(&render_markdown("```python\nx = 1\n\ny = <2>\n```"));
        assert_eq!(
            html,
            "<pre><code class=\"language-python\">x = 1\n\ny = &lt;2&gt;\n</code></pre>"
        );
    }

    #[test]
    fn renders_headings_lists_and_links() {
        let html = render(&render_markdown(
            "#### Q1. Title\n\n- [ ] a\n- [x] b\n\n[ref](https://x.io)",
        ));
        assert_eq!(
            html,
            "<h4>Q1. Title</h4><ul><li>[ ] a</li><li>[x] b</li></ul><p><a href=\"https://x.io\">ref</a></p>"
        );
    }

    #[test]
    fn image_children_become_alt_text() {
        let nodes = normalize("![a chart](images/c.png)", "sql", &ParserConfig::default());
        assert_eq!(
            render(&nodes),
            "<p><img src=\"static/data/sql/images/c.png\" alt=\"a chart\" /></p>"
        );
    }

    #[test]
    fn html_block_is_one_raw_node() {
        let nodes = render_markdown("<pre>\nfor x in y:\n    print(x)\n</pre>\n\nafter");
        assert_eq!(
            nodes[0],
            Node::Raw("<pre>\nfor x in y:\n    print(x)\n</pre>\n".to_string())
        );
        assert_eq!(render(&nodes[1..]), "<p>after</p>");
    }

    #[test]
    fn inline_html_passes_through() {
        let html = render(&render_markdown("a <kbd>Ctrl</kbd> b"));
        assert_eq!(html, "<p>a <kbd>Ctrl</kbd> b</p>");
    }
}
