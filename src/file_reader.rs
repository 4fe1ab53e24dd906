use std::fs;
use std::io::{self, BufRead, BufReader, Cursor, Read};
use std::path::Path;
use anyhow;
use thiserror::Error;

/// Signature token that opens every FIGlet font; the hard blank follows it directly.
pub const SIGNATURE: &str = "flf2a";

#[derive(Error, Debug)]
pub enum FigletError {
    #[error("cannot read font source {name}")]
    ResourceNotFound {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed header: {0}")]
    MalformedHeader(String),
    #[error("truncated font: {leftover} trailing line(s) do not fill a glyph of height {height}")]
    TruncatedFont { leftover: usize, height: usize },
}

fn malformed<S: Into<String>>(reason: S) -> FigletError {
    FigletError::MalformedHeader(reason.into())
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub signature: String,
    pub hard_blank: char,
    pub height: usize,
    pub baseline: i32,
    pub max_length: i32,
    pub old_layout: i32,
    pub comment_lines: usize,
    pub print_direction: Option<i32>,
    pub full_layout: Option<i32>,
    pub codetag_count: Option<i32>,
}

/// A font file split into its header, the comment block, and the glyph line table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileContents {
    pub header: Header,
    pub comments: Vec<String>,
    pub lines: Vec<String>,
}

pub trait FigRead {
    fn read_text_line(&mut self) -> io::Result<Option<String>>;
    fn read_header(&mut self) -> anyhow::Result<Header>;
    fn read_contents(&mut self) -> anyhow::Result<FileContents>;
}

impl<T> FigRead for T where T: BufRead {
    // Lines are split on LF only; a CR left over from CRLF files is dropped.
    fn read_text_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = vec![];
        if self.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        if buf.last() == Some(&b'\n') {
            buf.pop();
        }
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
        // Lines that are not UTF-8 are taken as Latin-1, one char per byte.
        let line = match String::from_utf8(buf) {
            Ok(line) => line,
            Err(err) => err.into_bytes().into_iter().map(char::from).collect(),
        };
        Ok(Some(line))
    }

    fn read_header(&mut self) -> anyhow::Result<Header> {
        let line = read_or_fail(self)?.ok_or_else(|| malformed("missing header line"))?;
        parse_header(&line)
    }

    fn read_contents(&mut self) -> anyhow::Result<FileContents> {
        let header = self.read_header()?;
        let mut comments = Vec::with_capacity(header.comment_lines.min(256));
        while comments.len() < header.comment_lines {
            let comment = read_or_fail(self)?.ok_or_else(|| {
                malformed(format!(
                    "expected {} comment lines, found {}",
                    header.comment_lines,
                    comments.len()
                ))
            })?;
            comments.push(comment);
        }
        let mut lines = vec![];
        while let Some(line) = read_or_fail(self)? {
            lines.push(line);
        }
        tracing::debug!(
            "read font header: height {}, hard blank {:?}, {} glyph lines",
            header.height,
            header.hard_blank,
            lines.len()
        );
        Ok(FileContents { header, comments, lines })
    }
}

fn read_or_fail<R: FigRead + ?Sized>(input: &mut R) -> Result<Option<String>, FigletError> {
    input.read_text_line().map_err(|source| FigletError::ResourceNotFound {
        name: String::from("<input>"),
        source,
    })
}

fn required_field<'a, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> anyhow::Result<i64> {
    let field = fields.next().ok_or_else(|| malformed(format!("missing {} field", name)))?;
    parse_field(field, name)
}

fn optional_field<'a, I: Iterator<Item = &'a str>>(fields: &mut I, name: &str) -> anyhow::Result<Option<i32>> {
    match fields.next() {
        Some(field) => Ok(Some(narrow(parse_field(field, name)?, name)?)),
        None => Ok(None),
    }
}

fn parse_field(field: &str, name: &str) -> anyhow::Result<i64> {
    Ok(field
        .parse::<i64>()
        .map_err(|_| malformed(format!("{} field {:?} is not a number", name, field)))?)
}

fn narrow<T: TryFrom<i64>>(value: i64, name: &str) -> anyhow::Result<T> {
    Ok(T::try_from(value).map_err(|_| malformed(format!("{} field {} is out of range", name, value)))?)
}

pub fn parse_header(line: &str) -> anyhow::Result<Header> {
    let mut fields = line.split_ascii_whitespace();
    let token = fields.next().ok_or_else(|| malformed("empty header line"))?;
    let rest = token
        .strip_prefix(SIGNATURE)
        .ok_or_else(|| malformed(format!("bad signature {:?}", token)))?;
    let mut rest_chars = rest.chars();
    let hard_blank = match (rest_chars.next(), rest_chars.next()) {
        (Some(c), None) => c,
        _ => anyhow::bail!(malformed(format!("no single hard blank after signature in {:?}", token))),
    };

    let height: usize = narrow(required_field(&mut fields, "height")?, "height")?;
    if height == 0 {
        anyhow::bail!(malformed("height must be positive"));
    }
    let baseline = narrow(required_field(&mut fields, "baseline")?, "baseline")?;
    let max_length = narrow(required_field(&mut fields, "max length")?, "max length")?;
    let old_layout = narrow(required_field(&mut fields, "old layout")?, "old layout")?;
    let comment_lines = narrow(required_field(&mut fields, "comment lines")?, "comment lines")?;
    let print_direction = optional_field(&mut fields, "print direction")?;
    let full_layout = optional_field(&mut fields, "full layout")?;
    let codetag_count = optional_field(&mut fields, "codetag count")?;

    Ok(Header {
        signature: String::from(SIGNATURE),
        hard_blank,
        height,
        baseline,
        max_length,
        old_layout,
        comment_lines,
        print_direction,
        full_layout,
        codetag_count,
    })
}

pub fn read_figlet<R: Read>(input: R) -> anyhow::Result<FileContents> {
    BufReader::new(input).read_contents()
}

pub fn parse_figlet(text: &str) -> anyhow::Result<FileContents> {
    Cursor::new(text.as_bytes()).read_contents()
}

pub fn open_figlet<P: AsRef<Path>>(path: P) -> anyhow::Result<FileContents> {
    let path = path.as_ref();
    let data = fs::read(path).map_err(|source| FigletError::ResourceNotFound {
        name: path.display().to_string(),
        source,
    })?;
    Cursor::new(data).read_contents()
}
