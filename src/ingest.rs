//! Keyword input formats.
//!
//! Accepted, in the order they are tried:
//! - the analysis response `{"words": [{"word": .., "weight": ..}]}`
//! - a bare JSON array of keyword objects
//! - either of the above written as JSON5
//! - one `word weight` pair per line (`#` starts a comment)

use crate::error::IngestError;
use crate::ir::Keyword;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?P<word>.+?)[\s,:;=]+(?P<weight>[-+]?(?:\d+\.?\d*|\.\d+)(?:[eE][-+]?\d+)?)$")
        .expect("keyword line regex")
});

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum KeywordDocument {
    Response { words: Vec<Keyword> },
    List(Vec<Keyword>),
}

impl KeywordDocument {
    fn into_keywords(self) -> Vec<Keyword> {
        match self {
            KeywordDocument::Response { words } => words,
            KeywordDocument::List(words) => words,
        }
    }
}

pub fn parse_keywords(input: &str) -> Result<Vec<Keyword>, IngestError> {
    let trimmed = input.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        return Err(IngestError::Empty);
    }

    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return parse_json_keywords(trimmed);
    }

    parse_line_keywords(trimmed)
}

fn parse_json_keywords(input: &str) -> Result<Vec<Keyword>, IngestError> {
    match serde_json::from_str::<KeywordDocument>(input) {
        Ok(doc) => Ok(doc.into_keywords()),
        Err(json_err) => json5::from_str::<KeywordDocument>(input)
            .map(KeywordDocument::into_keywords)
            .map_err(|_| IngestError::Json(json_err.to_string())),
    }
}

fn parse_line_keywords(input: &str) -> Result<Vec<Keyword>, IngestError> {
    let mut keywords = Vec::new();
    for (idx, raw_line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = strip_comment(raw_line).trim();
        if line.is_empty() {
            continue;
        }
        let Some(caps) = LINE_RE.captures(line) else {
            return Err(IngestError::Line {
                line: line_no,
                text: line.to_string(),
            });
        };
        let word = caps["word"].trim().trim_matches('"');
        let value = &caps["weight"];
        let weight: f64 = value.parse().map_err(|_| IngestError::Weight {
            line: line_no,
            value: value.to_string(),
        })?;
        keywords.push(Keyword::new(word, weight));
    }
    if keywords.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(keywords)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}
