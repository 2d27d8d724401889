//! Core document types.

/// Bullet glyphs for unordered lists, cycled by nesting depth.
pub const BULLET_MARKERS: [&str; 5] = ["•", "○", "▪", "▫", "▹"];

/// Bullet glyph for an unordered list at `depth`.
pub const fn bullet_marker(depth: usize) -> &'static str {
    BULLET_MARKERS[depth % BULLET_MARKERS.len()]
}

/// A parsed markdown document: the block tree plus its source.
///
/// Rebuilt from scratch on every parse; it never mutates its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Original source text
    source: String,
    /// Top-level blocks
    blocks: Vec<Block>,
}

impl Document {
    /// Create an empty document.
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) const fn from_blocks(source: String, blocks: Vec<Block>) -> Self {
        Self { source, blocks }
    }

    /// Get the source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All lists in the document, depth-first in source order.
    pub fn lists(&self) -> Vec<&List> {
        let mut out = Vec::new();
        collect_lists(&self.blocks, &mut out);
        out
    }

    /// Text content with all markup stripped.
    ///
    /// Blocks are separated by a blank line; soft breaks inside a
    /// paragraph stay as newlines.
    pub fn plain_text(&self) -> String {
        blocks_plain_text(&self.blocks)
    }
}

/// A block-level node of the document tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Heading at one of three visual levels (deeper levels present as 3)
    Heading { level: u8, inlines: Vec<InlineSpan> },
    Paragraph(Vec<InlineSpan>),
    List(List),
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    BlockQuote(Vec<Block>),
    ThematicBreak,
    /// GFM table as plain cell text; the first row is the header if `has_header`
    Table {
        rows: Vec<Vec<String>>,
        has_header: bool,
    },
}

/// A list node with its nesting depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    /// Number of list ancestors (0 for a top-level list)
    pub depth: usize,
    pub items: Vec<ListItem>,
}

impl List {
    /// Marker text for the item at `index`, without trailing space.
    pub fn marker(&self, index: usize) -> String {
        match self.kind {
            ListKind::Bullet { marker } => marker.to_string(),
            ListKind::Ordered { start, delimiter } => format!("{}{delimiter}", start + index),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Unordered list; the glyph depends only on depth
    Bullet { marker: &'static str },
    Ordered { start: usize, delimiter: char },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    /// List marker for this item: a bullet glyph or a number like `"3."`
    pub marker: String,
    /// `Some(checked)` for GFM task items
    pub task: Option<bool>,
    pub blocks: Vec<Block>,
}

/// Inline style flags for a text span.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InlineStyle {
    pub emphasis: bool,
    pub strong: bool,
    pub code: bool,
    pub strikethrough: bool,
    pub link: bool,
}

/// A styled inline span.
///
/// Soft and hard line breaks are spans holding a single `'\n'`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineSpan {
    text: String,
    style: InlineStyle,
}

impl InlineSpan {
    pub const fn new(text: String, style: InlineStyle) -> Self {
        Self { text, style }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text.into(), InlineStyle::default())
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub const fn style(&self) -> InlineStyle {
        self.style
    }
}

/// A single rendered line with styling information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    /// The text content of the line
    content: String,
    /// The type of line (for styling)
    line_type: LineType,
    /// Optional inline-styled spans for rendering
    spans: Vec<InlineSpan>,
}

impl RenderedLine {
    /// Create a new rendered line.
    pub const fn new(content: String, line_type: LineType) -> Self {
        Self {
            content,
            line_type,
            spans: Vec::new(),
        }
    }

    /// Create a new rendered line with inline spans.
    pub const fn with_spans(content: String, line_type: LineType, spans: Vec<InlineSpan>) -> Self {
        Self {
            content,
            line_type,
            spans,
        }
    }

    /// Get the text content.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the line type.
    pub const fn line_type(&self) -> &LineType {
        &self.line_type
    }

    /// Get inline spans, if present.
    pub fn spans(&self) -> Option<&[InlineSpan]> {
        if self.spans.is_empty() {
            None
        } else {
            Some(&self.spans)
        }
    }
}

/// Type of a rendered line, used for styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineType {
    /// Normal paragraph text
    Paragraph,
    /// Heading with visual level (1-3)
    Heading(u8),
    /// Code block line
    CodeBlock,
    /// Block quote line
    BlockQuote,
    /// List item with nesting depth
    ListItem(usize),
    /// Table row
    Table,
    /// Horizontal rule
    HorizontalRule,
    /// Empty line
    Empty,
}

pub(crate) fn spans_plain_text(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn blocks_plain_text(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(block_plain_text)
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn block_plain_text(block: &Block) -> String {
    match block {
        Block::Heading { inlines, .. } | Block::Paragraph(inlines) => spans_plain_text(inlines),
        Block::List(list) => list
            .items
            .iter()
            .map(|item| blocks_plain_text(&item.blocks))
            .collect::<Vec<_>>()
            .join("\n"),
        Block::CodeBlock { literal, .. } => literal.trim_end_matches('\n').to_string(),
        Block::BlockQuote(children) => blocks_plain_text(children),
        Block::ThematicBreak => String::new(),
        Block::Table { rows, .. } => rows
            .iter()
            .map(|row| row.join("\t"))
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn collect_lists<'a>(blocks: &'a [Block], out: &mut Vec<&'a List>) {
    for block in blocks {
        match block {
            Block::List(list) => {
                out.push(list);
                for item in &list.items {
                    collect_lists(&item.blocks, out);
                }
            }
            Block::BlockQuote(children) => collect_lists(children, out),
            _ => {}
        }
    }
}
