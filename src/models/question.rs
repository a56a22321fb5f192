use std::fmt;

use serde::{Deserialize, Serialize};

/// Shape of the answer a question expects.
///
/// The string form is passed to the model verbatim, so kinds outside the
/// known set are carried through unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AnswerKind {
    Number,
    Name,
    Names,
    Boolean,
    Other(String),
}

impl AnswerKind {
    /// Parse from string representation.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "number" => Self::Number,
            "name" => Self::Name,
            "names" => Self::Names,
            "boolean" => Self::Boolean,
            _ => Self::Other(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Number => "number",
            Self::Name => "name",
            Self::Names => "names",
            Self::Boolean => "boolean",
            Self::Other(s) => s,
        }
    }
}

impl From<String> for AnswerKind {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<AnswerKind> for String {
    fn from(kind: AnswerKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AnswerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A question from the input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    pub kind: AnswerKind,
}

impl Question {
    pub fn new(text: impl Into<String>, kind: AnswerKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}
