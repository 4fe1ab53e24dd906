//! Reads FIGlet (`.flf`) font files and exposes their glyphs as a [`Font`].
//!
//! Parsing happens in two steps: [`file_reader`] splits a file into its header and glyph
//! line table, and [`font_builder`] slices that table into glyph designs keyed by
//! character, starting at space.

pub mod catalog;
pub mod file_reader;
pub mod font;
pub mod font_builder;

pub use catalog::{load_dir, load_font, random_font};
pub use file_reader::{open_figlet, parse_figlet, read_figlet, FigletError, FileContents, Header};
pub use font::{Font, GlyphDesign};
pub use font_builder::{build_font, TrailingBlock};

/// Parses the text of a font file straight into a [`Font`].
pub fn parse_font(text: &str, policy: TrailingBlock) -> anyhow::Result<Font> {
    Font::from_contents(parse_figlet(text)?, policy)
}
