use serde::{Deserialize, Serialize};

use super::rules::is_plain_vowel;

/// Lexical category assigned to a token by the morphological parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Structure word (cmavo); the only category eligible for fusion.
    Particle,
    /// Five-letter root predicate (gismu).
    RootPredicate,
    /// Compound predicate (lujvo).
    CompoundPredicate,
    /// Borrowed predicate (fu'ivla).
    LoanWord,
    /// Consonant-final name (cmevla).
    ProperName,
    /// Anything the parser could not classify; dropped before transcription.
    NonLexical,
}

impl Category {
    pub fn is_lexical(self) -> bool {
        self != Category::NonLexical
    }
}

/// One word of a parsed utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub category: Category,
    pub surface: String,
}

impl Token {
    pub fn new(category: Category, surface: impl Into<String>) -> Self {
        Self {
            category,
            surface: surface.into(),
        }
    }

    /// The surface form as the transcriber sees it. See [`normalize_word`].
    pub fn normalized(&self) -> String {
        normalize_word(&self.surface)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseStatus {
    Success,
    Failure,
}

/// Output of a morphological parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub status: ParseStatus,
    pub tokens: Vec<Token>,
}

impl ParseResult {
    pub fn success(tokens: Vec<Token>) -> Self {
        Self {
            status: ParseStatus::Success,
            tokens,
        }
    }

    pub fn failure() -> Self {
        Self {
            status: ParseStatus::Failure,
            tokens: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == ParseStatus::Success
    }

    /// Read a parse produced by an external parser, e.g.
    /// `{"status":"success","tokens":[{"category":"particle","surface":"coi"}]}`.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Tokens that survive filtering: everything except [`Category::NonLexical`].
    pub fn lexical_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.category.is_lexical())
    }
}

/// Morphological parser: raw utterance text to tagged tokens.
pub trait Parser: Send + Sync {
    fn parse(&self, text: &str) -> ParseResult;
}

/// Apply the dot conventions of written Lojban and drop hyphens.
///
/// - vowel-initial words get a leading pause: `ui` → `.ui`
/// - `y`-final words not already dotted get a trailing pause
/// - consonant-final words (names) are wrapped: `djan` → `.djan.`
/// - doubled dots collapse
pub fn normalize_word(surface: &str) -> String {
    let mut word = surface.to_string();

    if word.chars().next().is_some_and(is_plain_vowel) {
        word.insert(0, '.');
    }
    if word.ends_with('y') && !word.starts_with('.') {
        word.push('.');
    }
    if word.chars().last().is_some_and(|c| !is_plain_vowel(c)) {
        word = format!(".{word}.");
    }

    word.replace("..", ".").replace('-', "")
}
