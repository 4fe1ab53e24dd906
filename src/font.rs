use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::sync::Arc;
use super::file_reader::FileContents;

/// The rows of one character's design, hard blanks already turned into spaces.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GlyphDesign {
    lines: Vec<String>,
}

impl GlyphDesign {
    pub fn new(lines: Vec<String>) -> GlyphDesign {
        GlyphDesign { lines }
    }

    pub fn height(&self) -> usize {
        self.lines.len()
    }

    /// Width in characters of the widest row.
    pub fn width(&self) -> usize {
        self.lines.iter().map(|line| line.chars().count()).max().unwrap_or(0)
    }

    pub fn lines(&self) -> &[String] {
        self.lines.as_slice()
    }
}

impl fmt::Display for GlyphDesign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines.join("\n"))
    }
}

#[derive(Clone, Debug, Default)]
pub struct Font {
    height: usize,
    glyphs: BTreeMap<char, GlyphDesign>,
    source: Option<Arc<FileContents>>,
}

impl Font {
    pub fn new() -> Font {
        Font::default()
    }

    pub(crate) fn with_height(height: usize) -> Font {
        Font { height, ..Font::default() }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Inserts the design for `ch`, replacing any earlier one. The font takes on the
    /// height of the glyph appended last.
    pub fn append_glyph(&mut self, ch: char, glyph: GlyphDesign) {
        self.height = glyph.height();
        self.glyphs.insert(ch, glyph);
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphDesign> {
        self.glyphs.get(&ch)
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, char, GlyphDesign> {
        self.glyphs.iter()
    }

    /// The parsed file this font was built from, if it was kept.
    pub fn file_contents(&self) -> Option<&FileContents> {
        self.source.as_deref()
    }

    pub(crate) fn set_source(&mut self, contents: Arc<FileContents>) {
        self.source = Some(contents);
    }
}

// Equality ignores provenance.
impl PartialEq for Font {
    fn eq(&self, other: &Font) -> bool {
        self.height == other.height && self.glyphs == other.glyphs
    }
}

impl Eq for Font {}

impl<'a> IntoIterator for &'a Font {
    type Item = (&'a char, &'a GlyphDesign);
    type IntoIter = btree_map::Iter<'a, char, GlyphDesign>;

    fn into_iter(self) -> Self::IntoIter {
        self.glyphs.iter()
    }
}
