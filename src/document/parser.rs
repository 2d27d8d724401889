//! Markdown parsing with comrak.
//!
//! comrak produces the AST; this module maps it onto the [`Block`] tree,
//! threading list depth down so every list knows how deeply it is nested.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeList, NodeValue};
use comrak::{Arena, Options, parse_document};

use super::types::{
    Block, Document, InlineSpan, InlineStyle, List, ListItem, ListKind, bullet_marker,
    spans_plain_text,
};

/// Highest heading level with its own presentation.
const MAX_HEADING_LEVEL: u8 = 3;

impl Document {
    /// Parse markdown source into a Document.
    ///
    /// # Example
    ///
    /// ```
    /// use memopad::document::Document;
    ///
    /// let doc = Document::parse("# Hello\n\nWorld");
    /// assert_eq!(doc.blocks().len(), 2);
    /// ```
    pub fn parse(source: &str) -> Self {
        parse(source)
    }
}

/// Parse markdown source into a Document.
pub fn parse(source: &str) -> Document {
    let arena = Arena::new();
    let options = create_options();
    let root = parse_document(&arena, source, &options);

    let blocks = convert_children(root, 0);
    Document::from_blocks(source.to_string(), blocks)
}

fn create_options() -> Options {
    let mut options = Options::default();

    // GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;

    options
}

/// Convert the block children of `node`. `list_depth` is the number of
/// list ancestors above them.
fn convert_children<'a>(node: &'a AstNode<'a>, list_depth: usize) -> Vec<Block> {
    let mut blocks = Vec::new();
    for child in node.children() {
        convert_block(child, list_depth, &mut blocks);
    }
    blocks
}

fn convert_block<'a>(node: &'a AstNode<'a>, list_depth: usize, out: &mut Vec<Block>) {
    match &node.data.borrow().value {
        NodeValue::Heading(heading) => out.push(Block::Heading {
            level: heading.level.clamp(1, MAX_HEADING_LEVEL),
            inlines: collect_inline_spans(node),
        }),
        NodeValue::Paragraph => out.push(Block::Paragraph(collect_inline_spans(node))),
        NodeValue::List(list) => out.push(Block::List(convert_list(node, list, list_depth))),
        NodeValue::CodeBlock(code_block) => out.push(Block::CodeBlock {
            info: code_block
                .info
                .split_whitespace()
                .next()
                .map(ToString::to_string),
            literal: code_block.literal.clone(),
        }),
        NodeValue::HtmlBlock(html) => {
            // Raw HTML is shown as text.
            let text = html.literal.trim_end_matches('\n').to_string();
            out.push(Block::Paragraph(vec![InlineSpan::plain(text)]));
        }
        NodeValue::BlockQuote => out.push(Block::BlockQuote(convert_children(node, list_depth))),
        NodeValue::ThematicBreak => out.push(Block::ThematicBreak),
        NodeValue::Table(_) => {
            let (rows, has_header) = collect_table_rows(node);
            out.push(Block::Table { rows, has_header });
        }
        _ => {
            for child in node.children() {
                convert_block(child, list_depth, out);
            }
        }
    }
}

fn convert_list<'a>(node: &'a AstNode<'a>, list: &NodeList, depth: usize) -> List {
    let kind = match list.list_type {
        ListType::Bullet => ListKind::Bullet {
            marker: bullet_marker(depth),
        },
        ListType::Ordered => ListKind::Ordered {
            start: list.start,
            delimiter: match list.delimiter {
                ListDelimType::Paren => ')',
                ListDelimType::Period => '.',
            },
        },
    };

    let mut out = List {
        kind,
        depth,
        items: Vec::new(),
    };
    for (index, child) in node.children().enumerate() {
        let task = match &child.data.borrow().value {
            NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
            NodeValue::Item(_) => find_task_state(child),
            _ => continue,
        };
        out.items.push(ListItem {
            marker: out.marker(index),
            task,
            blocks: convert_children(child, depth + 1),
        });
    }
    out
}

fn find_task_state<'a>(node: &'a AstNode<'a>) -> Option<bool> {
    node.children().find_map(|child| match &child.data.borrow().value {
        NodeValue::TaskItem(symbol) => Some(symbol.is_some()),
        _ => None,
    })
}

fn collect_table_rows<'a>(table_node: &'a AstNode<'a>) -> (Vec<Vec<String>>, bool) {
    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        let NodeValue::TableRow(is_header) = row_node.data.borrow().value else {
            continue;
        };
        has_header |= is_header;

        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| {
                spans_plain_text(&collect_inline_spans(cell))
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect();
        rows.push(cells);
    }
    (rows, has_header)
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    for child in node.children() {
        collect_inline_spans_recursive(child, InlineStyle::default(), &mut spans);
    }
    merge_adjacent(spans)
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    match &node.data.borrow().value {
        // Block children of an item are converted separately.
        NodeValue::List(_)
        | NodeValue::Item(_)
        | NodeValue::Paragraph
        | NodeValue::CodeBlock(_)
        | NodeValue::BlockQuote => {}
        NodeValue::Text(t) => spans.push(InlineSpan::new(t.clone(), style)),
        NodeValue::HtmlInline(html) => spans.push(InlineSpan::new(html.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                link: style.link,
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => {
            let next = InlineStyle {
                emphasis: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strong => {
            let next = InlineStyle {
                strong: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Strikethrough => {
            let next = InlineStyle {
                strikethrough: true,
                ..style
            };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::Link(_) | NodeValue::Image(_) => {
            let next = InlineStyle { link: true, ..style };
            for child in node.children() {
                collect_inline_spans_recursive(child, next, spans);
            }
        }
        NodeValue::SoftBreak | NodeValue::LineBreak => {
            spans.push(InlineSpan::new("\n".to_string(), style));
        }
        _ => {
            for child in node.children() {
                collect_inline_spans_recursive(child, style, spans);
            }
        }
    }
}

/// comrak splits text at every special character; join runs that share a
/// style so spans stay word-sized.
fn merge_adjacent(spans: Vec<InlineSpan>) -> Vec<InlineSpan> {
    let mut out: Vec<InlineSpan> = Vec::with_capacity(spans.len());
    for span in spans {
        match out.last_mut() {
            Some(last) if last.style() == span.style() && span.text() != "\n" && last.text() != "\n" => {
                let text = format!("{}{}", last.text(), span.text());
                *last = InlineSpan::new(text, span.style());
            }
            _ => out.push(span),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only_list(doc: &Document) -> &List {
        match doc.blocks() {
            [Block::List(list)] => list,
            other => panic!("expected a single list, got {other:?}"),
        }
    }

    fn nested_list(item: &ListItem) -> &List {
        item.blocks
            .iter()
            .find_map(|block| match block {
                Block::List(list) => Some(list),
                _ => None,
            })
            .expect("item has a nested list")
    }

    #[test]
    fn test_parse_heading() {
        let doc = parse("# Hello World");
        assert_eq!(
            doc.blocks(),
            &[Block::Heading {
                level: 1,
                inlines: vec![InlineSpan::plain("Hello World")],
            }]
        );
    }

    #[test]
    fn test_deep_headings_clamp_to_level_three() {
        let doc = parse("#### Four\n\n###### Six");
        let levels: Vec<u8> = doc
            .blocks()
            .iter()
            .filter_map(|block| match block {
                Block::Heading { level, .. } => Some(*level),
                _ => None,
            })
            .collect();
        assert_eq!(levels, vec![3, 3]);
    }

    #[test]
    fn test_paragraph_inline_styles() {
        let doc = parse("plain **bold** *em* `code` ~~gone~~");
        let Block::Paragraph(spans) = &doc.blocks()[0] else {
            panic!("expected paragraph");
        };
        let styled: Vec<(&str, InlineStyle)> =
            spans.iter().map(|span| (span.text(), span.style())).collect();
        assert!(styled.contains(&(
            "bold",
            InlineStyle {
                strong: true,
                ..InlineStyle::default()
            }
        )));
        assert!(styled.contains(&(
            "em",
            InlineStyle {
                emphasis: true,
                ..InlineStyle::default()
            }
        )));
        assert!(styled.contains(&(
            "code",
            InlineStyle {
                code: true,
                ..InlineStyle::default()
            }
        )));
        assert!(styled.iter().any(|(text, style)| *text == "gone" && style.strikethrough));
    }

    #[test]
    fn test_soft_break_is_newline_span() {
        let doc = parse("one\ntwo");
        let Block::Paragraph(spans) = &doc.blocks()[0] else {
            panic!("expected paragraph");
        };
        assert_eq!(spans_plain_text(spans), "one\ntwo");
    }

    #[test]
    fn test_nested_bullets_cycle_markers_by_depth() {
        let doc = parse("- a\n  - b\n    - c\n");
        let outer = only_list(&doc);
        let middle = nested_list(&outer.items[0]);
        let inner = nested_list(&middle.items[0]);

        assert_eq!((outer.depth, outer.items[0].marker.as_str()), (0, "•"));
        assert_eq!((middle.depth, middle.items[0].marker.as_str()), (1, "○"));
        assert_eq!((inner.depth, inner.items[0].marker.as_str()), (2, "▪"));
    }

    #[test]
    fn test_sixth_level_wraps_to_first_marker() {
        let doc = parse("- 0\n  - 1\n    - 2\n      - 3\n        - 4\n          - 5\n");
        let mut list = only_list(&doc);
        for _ in 0..5 {
            list = nested_list(&list.items[0]);
        }
        assert_eq!(list.depth, 5);
        assert_eq!(list.items[0].marker, "•");
    }

    #[test]
    fn test_ordered_list_is_numeric_at_any_depth() {
        let doc = parse("- a\n  - b\n    1. first\n    2. second\n");
        let outer = only_list(&doc);
        let ordered = nested_list(&nested_list(&outer.items[0]).items[0]);
        assert_eq!(ordered.depth, 2);
        assert!(matches!(ordered.kind, ListKind::Ordered { start: 1, .. }));
        let markers: Vec<&str> = ordered.items.iter().map(|i| i.marker.as_str()).collect();
        assert_eq!(markers, vec!["1.", "2."]);
    }

    #[test]
    fn test_ordered_list_keeps_start_and_delimiter() {
        let doc = parse("7) seven\n8) eight\n");
        let list = only_list(&doc);
        let markers: Vec<&str> = list.items.iter().map(|i| i.marker.as_str()).collect();
        assert_eq!(markers, vec!["7)", "8)"]);
    }

    #[test]
    fn test_bullet_under_ordered_counts_depth() {
        let doc = parse("1. one\n   - inner\n");
        let inner = nested_list(&only_list(&doc).items[0]);
        assert_eq!(inner.depth, 1);
        assert_eq!(inner.items[0].marker, "○");
    }

    #[test]
    fn test_task_items() {
        let doc = parse("- [ ] todo\n- [x] done\n- plain\n");
        let tasks: Vec<Option<bool>> = only_list(&doc).items.iter().map(|i| i.task).collect();
        assert_eq!(tasks, vec![Some(false), Some(true), None]);
    }

    #[test]
    fn test_code_block_keeps_literal_and_language() {
        let doc = parse("```rust\nfn main() {}\n```\n");
        assert_eq!(
            doc.blocks(),
            &[Block::CodeBlock {
                info: Some("rust".to_string()),
                literal: "fn main() {}\n".to_string(),
            }]
        );
    }

    #[test]
    fn test_blockquote_contains_blocks() {
        let doc = parse("> quoted\n> - item\n");
        let Block::BlockQuote(children) = &doc.blocks()[0] else {
            panic!("expected blockquote");
        };
        assert!(matches!(children[0], Block::Paragraph(_)));
        assert!(matches!(&children[1], Block::List(list) if list.depth == 0));
    }

    #[test]
    fn test_table_rows() {
        let doc = parse("| a | b |\n|---|---|\n| 1 | **2** |\n");
        assert_eq!(
            doc.blocks(),
            &[Block::Table {
                rows: vec![
                    vec!["a".to_string(), "b".to_string()],
                    vec!["1".to_string(), "2".to_string()],
                ],
                has_header: true,
            }]
        );
    }

    #[test]
    fn test_thematic_break() {
        let doc = parse("a\n\n---\n\nb");
        assert_eq!(doc.blocks()[1], Block::ThematicBreak);
    }

    #[test]
    fn test_html_block_shown_as_text() {
        let doc = parse("<div>hi</div>\n");
        assert_eq!(
            doc.blocks(),
            &[Block::Paragraph(vec![InlineSpan::plain("<div>hi</div>")])]
        );
    }

    #[test]
    fn test_parse_does_not_mutate_source() {
        let source = "- a\n  - b";
        let doc = parse(source);
        assert_eq!(doc.source(), source);
    }
}
