use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use crate::error::{Result, SampleError};

/// Number of tab-separated columns in a CoNLL-U token row.
pub const CONLLU_FIELDS: usize = 10;

/// One blank-line delimited block of a CoNLL-U file.
///
/// Lines are kept verbatim (comments included) so a sampled sentence is
/// written back exactly as it was read. Lines are stored without their
/// terminator; the block's terminator (LF or CRLF, taken from its first line)
/// is reapplied on write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    lines: Vec<String>,
    source: Arc<Path>,
    line: usize,
    crlf: bool,
}

impl Sentence {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Token rows only, in file order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.lines
            .iter()
            .map(String::as_str)
            .filter(|line| !is_comment(line))
    }

    /// Token length: the number of non-comment lines.
    pub fn len(&self) -> usize {
        self.tokens().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// File the sentence was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// 1-based line number of the first line of the block.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn line_ending(&self) -> &'static str {
        if self.crlf {
            "\r\n"
        } else {
            "\n"
        }
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        let eol = self.line_ending();
        for line in &self.lines {
            write!(writer, "{}{}", line, eol)?;
        }
        write!(writer, "{}", eol)
    }
}

/// Splits off the terminator, reporting whether it was CRLF.
fn split_terminator(raw: &str) -> (&str, bool) {
    match raw.strip_suffix('\n') {
        Some(line) => match line.strip_suffix('\r') {
            Some(line) => (line, true),
            None => (line, false),
        },
        None => (raw, false),
    }
}

fn is_comment(line: &str) -> bool {
    line.starts_with('#')
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Accepts word ids (`3`), multiword ranges (`3-4`) and empty nodes (`3.1`).
fn is_valid_id(id: &str) -> bool {
    if is_number(id) {
        return true;
    }
    match id.split_once(['-', '.']) {
        Some((head, tail)) => is_number(head) && is_number(tail),
        None => false,
    }
}

fn check_token_row(row: &str) -> std::result::Result<(), String> {
    let fields: Vec<&str> = row.split('\t').collect();
    if fields.len() != CONLLU_FIELDS {
        return Err(format!(
            "expected {} tab-separated fields, found {}",
            CONLLU_FIELDS,
            fields.len()
        ));
    }
    if !is_valid_id(fields[0]) {
        return Err(format!("invalid token id `{}`", fields[0]));
    }
    Ok(())
}

/// Splits CoNLL-U text into sentences, validating every token row.
pub fn parse_str(text: &str, source: &Path) -> Result<Vec<Sentence>> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let source: Arc<Path> = Arc::from(source);

    let mut sentences = Vec::new();
    let mut block: Vec<String> = Vec::new();
    let mut start = 0;
    let mut crlf = false;

    let mut flush = |block: &mut Vec<String>, start: usize, crlf: bool| -> Result<()> {
        if block.is_empty() {
            return Ok(());
        }
        if block.iter().all(|line| is_comment(line)) {
            return Err(SampleError::Parse {
                path: source.to_path_buf(),
                line: start,
                reason: "sentence has comments but no token rows".to_string(),
            });
        }
        sentences.push(Sentence {
            lines: std::mem::take(block),
            source: Arc::clone(&source),
            line: start,
            crlf,
        });
        Ok(())
    };

    for (idx, raw) in text.split_inclusive('\n').enumerate() {
        let line_no = idx + 1;
        let (line, line_crlf) = split_terminator(raw);
        if is_blank(line) {
            flush(&mut block, start, crlf)?;
            continue;
        }
        if !is_comment(line) {
            check_token_row(line).map_err(|reason| SampleError::Parse {
                path: source.to_path_buf(),
                line: line_no,
                reason,
            })?;
        }
        if block.is_empty() {
            start = line_no;
            crlf = line_crlf;
        }
        block.push(line.to_string());
    }
    flush(&mut block, start, crlf)?;

    Ok(sentences)
}

pub fn read_sentences<P: AsRef<Path>>(path: P) -> Result<Vec<Sentence>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|e| SampleError::io(path, e))?;
    parse_str(&text, path)
}

/// Writes sentences as CoNLL-U, each block followed by a blank line.
pub fn write_sentences<W: Write>(writer: &mut W, sentences: &[Sentence]) -> std::io::Result<()> {
    for sentence in sentences {
        sentence.write_to(writer)?;
    }
    Ok(())
}
