use std::mem;
use std::sync::Arc;
use anyhow;
use super::file_reader::*;
use super::font::{Font, GlyphDesign};

/// Code point given to the first glyph block in a file.
pub const FIRST_CODE_POINT: u32 = 32;

/// What to do with a final block that has fewer than `height` lines.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq)]
pub enum TrailingBlock {
    #[default]
    Discard,
    Reject,
}

struct Context {
    font: Font,
    height: usize,
    hard_blank: char,
    buffer: Vec<String>,
    next_code: Option<u32>,
}

fn make_context(header: &Header) -> Context {
    Context {
        font: Font::with_height(header.height),
        height: header.height,
        hard_blank: header.hard_blank,
        buffer: Vec::with_capacity(header.height.min(256)),
        next_code: Some(FIRST_CODE_POINT),
    }
}

// The marker itself is never checked, only how many trailing characters to drop:
// one on every row, two on the last row of a glyph.
fn strip_terminator(line: &str, last_row: bool) -> &str {
    let count = if last_row { 2 } else { 1 };
    let mut stripped = line.chars();
    for _ in 0..count {
        stripped.next_back();
    }
    stripped.as_str()
}

fn push_line(line: &str, ctx: &mut Context) {
    let last_row = ctx.buffer.len() + 1 >= ctx.height;
    let row = strip_terminator(line, last_row).replace(ctx.hard_blank, " ");
    ctx.buffer.push(row);
    if ctx.buffer.len() == ctx.height {
        emit_glyph(ctx);
    }
}

// Once the code points run past the last valid char, later glyph blocks are dropped
// rather than assigned.
fn emit_glyph(ctx: &mut Context) {
    let lines = mem::take(&mut ctx.buffer);
    let code = match ctx.next_code {
        Some(code) => code,
        None => return,
    };
    match char::from_u32(code) {
        Some(ch) => {
            ctx.font.append_glyph(ch, GlyphDesign::new(lines));
            ctx.next_code = code.checked_add(1);
        }
        None => {
            tracing::warn!("no character for code point {:#x}, ignoring the remaining glyphs", code);
            ctx.next_code = None;
        }
    }
}

fn finish(ctx: Context, policy: TrailingBlock) -> anyhow::Result<Font> {
    if !ctx.buffer.is_empty() {
        let leftover = ctx.buffer.len();
        match policy {
            TrailingBlock::Discard => {
                tracing::debug!("discarding {} trailing line(s) of an incomplete glyph", leftover);
            }
            TrailingBlock::Reject => {
                anyhow::bail!(FigletError::TruncatedFont { leftover, height: ctx.height })
            }
        }
    }
    Ok(ctx.font)
}

/// Slices the line table of `contents` into glyphs, one per `height` lines, keyed from
/// space upwards.
pub fn build_font(contents: &FileContents, policy: TrailingBlock) -> anyhow::Result<Font> {
    let mut ctx = make_context(&contents.header);
    for line in contents.lines.iter() {
        push_line(line, &mut ctx);
    }
    let font = finish(ctx, policy)?;
    tracing::debug!("built font with {} glyphs of height {}", font.len(), font.height());
    Ok(font)
}

impl Font {
    /// Builds a font and keeps `contents` attached to it.
    pub fn from_contents(contents: FileContents, policy: TrailingBlock) -> anyhow::Result<Font> {
        let mut font = build_font(&contents, policy)?;
        font.set_source(Arc::new(contents));
        Ok(font)
    }
}
