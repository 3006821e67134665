//! Line lexer shared by the party and trainer table scanners.
//!
//! The tables are C source but only ever edited in a small set of shapes, so they are
//! read as a stream of non-blank lines split on whitespace. The scanners dispatch on
//! the first token of each line.

use std::iter::Enumerate;
use std::str::Lines;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{artifact}:{line}: {message}")]
    Syntax {
        artifact: String,
        line: usize,
        message: String,
    },
    #[error("{artifact}: unexpected end of input: {message}")]
    UnexpectedEof { artifact: String, message: String },
    #[error("{artifact}:{line}: party {identifier} is not defined in the party table")]
    MissingReference {
        artifact: String,
        line: usize,
        identifier: String,
    },
    #[error("{artifact}:{line}: duplicate identifier {identifier}")]
    Duplicate {
        artifact: String,
        line: usize,
        identifier: String,
    },
}

impl ParseError {
    pub fn artifact(&self) -> &str {
        match self {
            Self::Syntax { artifact, .. }
            | Self::UnexpectedEof { artifact, .. }
            | Self::MissingReference { artifact, .. }
            | Self::Duplicate { artifact, .. } => artifact,
        }
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::MissingReference { line, .. }
            | Self::Duplicate { line, .. } => Some(*line),
            Self::UnexpectedEof { .. } => None,
        }
    }
}

/// One non-blank source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number.
    pub number: usize,
    pub raw: &'a str,
    pub tokens: Vec<&'a str>,
}

impl<'a> Line<'a> {
    pub fn tag(&self) -> &'a str {
        self.tokens[0]
    }

    pub fn token(&self, index: usize) -> Option<&'a str> {
        self.tokens.get(index).copied()
    }

    pub fn last(&self) -> &'a str {
        self.tokens[self.tokens.len() - 1]
    }

    /// Tokens after `<tag> =`.
    pub fn values(&self) -> &[&'a str] {
        self.tokens.get(2..).unwrap_or(&[])
    }

    /// Content between the first pair of double quotes.
    pub fn quoted(&self) -> Option<&'a str> {
        let mut parts = self.raw.split('"');
        parts.next()?;
        let content = parts.next()?;
        parts.next().map(|_| content)
    }
}

/// Strips list punctuation around a token: leading `{`, trailing `}` and `,`.
pub fn trim_list_punct(token: &str) -> &str {
    token
        .trim_start_matches('{')
        .trim_end_matches(['}', ','])
}

pub struct Lexer<'a> {
    artifact: String,
    lines: Enumerate<Lines<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(artifact: impl Into<String>, text: &'a str) -> Self {
        Self {
            artifact: artifact.into(),
            lines: text.lines().enumerate(),
        }
    }

    pub fn artifact(&self) -> &str {
        &self.artifact
    }

    pub fn syntax(&self, line: &Line<'_>, message: impl Into<String>) -> ParseError {
        ParseError::Syntax {
            artifact: self.artifact.clone(),
            line: line.number,
            message: message.into(),
        }
    }

    pub fn eof(&self, message: impl Into<String>) -> ParseError {
        ParseError::UnexpectedEof {
            artifact: self.artifact.clone(),
            message: message.into(),
        }
    }

    pub fn duplicate(&self, line: &Line<'_>, identifier: &str) -> ParseError {
        ParseError::Duplicate {
            artifact: self.artifact.clone(),
            line: line.number,
            identifier: identifier.to_string(),
        }
    }

    pub fn missing_reference(&self, line: &Line<'_>, identifier: &str) -> ParseError {
        ParseError::MissingReference {
            artifact: self.artifact.clone(),
            line: line.number,
            identifier: identifier.to_string(),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Line<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        for (index, raw) in self.lines.by_ref() {
            let tokens: Vec<&str> = raw.split_whitespace().collect();
            if tokens.is_empty() {
                continue;
            }
            return Some(Line {
                number: index + 1,
                raw,
                tokens,
            });
        }
        None
    }
}
