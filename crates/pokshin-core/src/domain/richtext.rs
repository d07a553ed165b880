//! Structured rich text for post bodies.
//!
//! A document is a list of blocks, each a list of styled runs. Formatting is
//! applied through a small command set over a character selection inside one
//! block. Runs are kept normalized: no empty runs, no two adjacent runs with
//! the same style.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RichTextError {
    #[error("Block {block} out of range (document has {len} blocks)")]
    BlockOutOfRange { block: usize, len: usize },

    #[error("Invalid selection {start}..{end} (block has {len} characters)")]
    InvalidRange { start: usize, end: usize, len: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),
}

/// Text color, `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = RichTextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RichTextError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl TryFrom<String> for Color {
    type Error = RichTextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    #[serde(default)]
    pub style: Style,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: Style::default(),
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    #[default]
    Paragraph,
    Blockquote,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub kind: BlockKind,
    #[serde(default)]
    pub runs: Vec<TextRun>,
}

impl Block {
    pub fn paragraph(text: impl Into<String>) -> Self {
        let mut block = Self {
            kind: BlockKind::Paragraph,
            runs: vec![TextRun::plain(text)],
        };
        block.normalize();
        block
    }

    pub fn char_len(&self) -> usize {
        self.runs.iter().map(TextRun::char_len).sum()
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Split the run containing `pos` so that a run boundary falls exactly on it.
    fn split_at(&mut self, pos: usize) {
        let mut offset = 0;
        for i in 0..self.runs.len() {
            let len = self.runs[i].char_len();
            if pos > offset && pos < offset + len {
                let run = &mut self.runs[i];
                let byte = run
                    .text
                    .char_indices()
                    .nth(pos - offset)
                    .map(|(idx, _)| idx)
                    .unwrap_or(run.text.len());
                let tail = TextRun {
                    text: run.text.split_off(byte),
                    style: run.style,
                };
                self.runs.insert(i + 1, tail);
                return;
            }
            offset += len;
        }
    }

    /// Runs overlapping `start..end`.
    fn overlapping(&self, start: usize, end: usize) -> impl Iterator<Item = &TextRun> {
        let mut offset = 0;
        self.runs.iter().filter(move |run| {
            let run_start = offset;
            offset += run.char_len();
            run_start < end && offset > start
        })
    }

    fn restyle(&mut self, start: usize, end: usize, apply: impl Fn(&mut Style)) {
        self.split_at(end);
        self.split_at(start);
        let mut offset = 0;
        for run in &mut self.runs {
            let len = run.char_len();
            if offset >= start && offset + len <= end {
                apply(&mut run.style);
            }
            offset += len;
        }
        self.normalize();
    }

    fn normalize(&mut self) {
        let mut merged: Vec<TextRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.text.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last) if last.style == run.style => last.text.push_str(&run.text),
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }

    fn to_html(&self, out: &mut String) {
        let tag = match self.kind {
            BlockKind::Paragraph => "p",
            BlockKind::Blockquote => "blockquote",
        };
        out.push('<');
        out.push_str(tag);
        out.push('>');
        if self.runs.is_empty() {
            out.push_str("<br>");
        }
        for run in &self.runs {
            let style = run.style;
            if let Some(color) = style.color {
                out.push_str(&format!("<span style=\"color:{color}\">"));
            }
            if style.underline {
                out.push_str("<u>");
            }
            if style.italic {
                out.push_str("<i>");
            }
            if style.bold {
                out.push_str("<b>");
            }
            escape_into(&run.text, out);
            if style.bold {
                out.push_str("</b>");
            }
            if style.italic {
                out.push_str("</i>");
            }
            if style.underline {
                out.push_str("</u>");
            }
            if style.color.is_some() {
                out.push_str("</span>");
            }
        }
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

/// A character range `start..end` inside one block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub block: usize,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(block: usize, start: usize, end: usize) -> Self {
        Self { block, start, end }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// Editor commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "value", rename_all = "camelCase")]
pub enum EditCommand {
    ToggleBold,
    ToggleItalic,
    ToggleUnderline,
    SetForeColor(Color),
    FormatBlockquote,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl RichText {
    pub fn new() -> Self {
        Self::default()
    }

    /// One paragraph per line.
    pub fn from_plain_text(text: &str) -> Self {
        Self {
            blocks: text.lines().map(Block::paragraph).collect(),
        }
    }

    /// True when the document holds no visible text.
    pub fn is_blank(&self) -> bool {
        self.blocks
            .iter()
            .flat_map(|b| &b.runs)
            .all(|r| r.text.trim().is_empty())
    }

    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .map(Block::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            block.to_html(&mut out);
        }
        out
    }

    pub fn apply(&mut self, command: EditCommand, selection: Selection) -> Result<(), RichTextError> {
        match command {
            EditCommand::ToggleBold => self.toggle(selection, |s| s.bold, |s, on| s.bold = on),
            EditCommand::ToggleItalic => self.toggle(selection, |s| s.italic, |s, on| s.italic = on),
            EditCommand::ToggleUnderline => {
                self.toggle(selection, |s| s.underline, |s, on| s.underline = on)
            }
            EditCommand::SetForeColor(color) => self.set_fore_color(selection, color),
            EditCommand::FormatBlockquote => self.format_blockquote(selection.block),
        }
    }

    pub fn toggle_bold(&mut self, selection: Selection) -> Result<(), RichTextError> {
        self.apply(EditCommand::ToggleBold, selection)
    }

    pub fn toggle_italic(&mut self, selection: Selection) -> Result<(), RichTextError> {
        self.apply(EditCommand::ToggleItalic, selection)
    }

    pub fn toggle_underline(&mut self, selection: Selection) -> Result<(), RichTextError> {
        self.apply(EditCommand::ToggleUnderline, selection)
    }

    pub fn set_fore_color(&mut self, selection: Selection, color: Color) -> Result<(), RichTextError> {
        let block = self.checked_block(selection)?;
        if !selection.is_collapsed() {
            block.restyle(selection.start, selection.end, |s| s.color = Some(color));
        }
        Ok(())
    }

    pub fn format_blockquote(&mut self, block: usize) -> Result<(), RichTextError> {
        let len = self.blocks.len();
        let target = self
            .blocks
            .get_mut(block)
            .ok_or(RichTextError::BlockOutOfRange { block, len })?;
        target.kind = BlockKind::Blockquote;
        Ok(())
    }

    /// Removes the style when every selected character has it, applies it otherwise.
    fn toggle(
        &mut self,
        selection: Selection,
        has: impl Fn(&Style) -> bool,
        set: impl Fn(&mut Style, bool),
    ) -> Result<(), RichTextError> {
        let block = self.checked_block(selection)?;
        if selection.is_collapsed() {
            return Ok(());
        }
        let on = !block
            .overlapping(selection.start, selection.end)
            .all(|run| has(&run.style));
        block.restyle(selection.start, selection.end, |s| set(s, on));
        Ok(())
    }

    fn checked_block(&mut self, selection: Selection) -> Result<&mut Block, RichTextError> {
        let len = self.blocks.len();
        let block = self
            .blocks
            .get_mut(selection.block)
            .ok_or(RichTextError::BlockOutOfRange {
                block: selection.block,
                len,
            })?;
        let chars = block.char_len();
        if selection.start > selection.end || selection.end > chars {
            return Err(RichTextError::InvalidRange {
                start: selection.start,
                end: selection.end,
                len: chars,
            });
        }
        Ok(block)
    }
}

fn escape_into(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
}
