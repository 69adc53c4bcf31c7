//! Comment handling and the source document model
//!
//! Comments are removed before any other stage runs. String literals are not
//! tracked, so a `--` or `/*` inside a quoted string is treated as a comment
//! marker.

use std::sync::LazyLock;

use regex::Regex;

/// Block comments (non-greedy, across lines) or line comments, whichever starts first
static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/|--[^\n]*").unwrap());

/// A SQL script as read from disk, with its comment-free projection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    raw: String,
    leading_comments: String,
    cleaned: String,
    /// `(cleaned offset, bytes removed up to there)` for every stripped comment
    removed: Vec<(usize, usize)>,
}

impl SourceDocument {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let leading_comments = leading_comments(&raw).to_string();

        let mut cleaned = String::with_capacity(raw.len());
        let mut removed = Vec::new();
        let mut last = 0;
        for comment in COMMENT_RE.find_iter(&raw) {
            cleaned.push_str(&raw[last..comment.start()]);
            removed.push((cleaned.len(), comment.end() - cleaned.len()));
            last = comment.end();
        }
        cleaned.push_str(&raw[last..]);

        Self {
            raw,
            leading_comments,
            cleaned,
            removed,
        }
    }

    /// Map a byte offset in [`cleaned`](Self::cleaned) back into the raw text
    pub fn raw_offset(&self, cleaned_offset: usize) -> usize {
        let idx = self
            .removed
            .partition_point(|&(at, _)| at <= cleaned_offset);
        match idx {
            0 => cleaned_offset,
            _ => cleaned_offset + self.removed[idx - 1].1,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Documentation block at the top of the script, trimmed
    pub fn leading_comments(&self) -> &str {
        &self.leading_comments
    }

    /// Script text with every comment removed
    pub fn cleaned(&self) -> &str {
        &self.cleaned
    }
}

/// Remove all block and line comments. Line breaks ending a line comment are kept.
pub fn strip(text: &str) -> String {
    COMMENT_RE.replace_all(text, "").into_owned()
}

/// The run of comments at the very start of `text`, trimmed of surrounding whitespace.
///
/// Returns an empty string when code starts immediately. A final line comment
/// without a trailing newline still counts; an unterminated block comment ends
/// the run.
pub fn leading_comments(text: &str) -> &str {
    let mut pos = 0;
    let mut end = 0;

    loop {
        let rest = &text[pos..];
        let skipped = rest.len() - rest.trim_start().len();
        let rest = &rest[skipped..];

        if rest.starts_with("/*") {
            match rest[2..].find("*/") {
                Some(close) => {
                    pos += skipped + 2 + close + 2;
                    end = pos;
                }
                None => break,
            }
        } else if rest.starts_with("--") {
            pos += skipped + rest.find('\n').unwrap_or(rest.len());
            end = pos;
        } else {
            break;
        }
    }

    text[..end].trim()
}
