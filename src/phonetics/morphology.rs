use super::rules::{is_consonant, is_plain_vowel};
use super::token::{Category, ParseResult, Parser, Token};

/// Word-level parser for space-separated Lojban text.
///
/// Classifies each whitespace-delimited word by its shape alone. It does not
/// split run-together particles (`lenu`) and does not tell loanwords from
/// compounds; only the particle/non-particle distinction affects
/// transcription, and that it gets right for well-spaced text.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleMorphology;

impl SimpleMorphology {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(word: &str) -> Category {
        let bare = word.trim_matches(|c| c == '.' || c == ',');
        if bare.is_empty() || !bare.chars().all(is_lojban_char) {
            return Category::NonLexical;
        }

        let letters: Vec<char> = bare.chars().filter(|&c| c != ',').collect();
        match letters.last() {
            Some(&c) if !is_plain_vowel(c) => return Category::ProperName,
            None => return Category::NonLexical,
            _ => {}
        }

        let head = &letters[..letters.len().min(5)];
        if !head.windows(2).any(|w| is_consonant(w[0]) && is_consonant(w[1])) {
            return Category::Particle;
        }

        if is_root_shape(&letters) {
            Category::RootPredicate
        } else {
            Category::CompoundPredicate
        }
    }
}

impl Parser for SimpleMorphology {
    fn parse(&self, text: &str) -> ParseResult {
        let text = text.to_lowercase();
        let tokens: Vec<Token> = text
            .split_whitespace()
            .map(|word| Token::new(Self::classify(word), word))
            .collect();

        if tokens.is_empty() {
            return ParseResult::failure();
        }
        ParseResult::success(tokens)
    }
}

fn is_lojban_char(c: char) -> bool {
    is_plain_vowel(c) || is_consonant(c) || matches!(c, '\'' | '.' | ',')
}

/// CVCCV or CCVCV.
fn is_root_shape(letters: &[char]) -> bool {
    const CVCCV: [bool; 5] = [true, false, true, true, false];
    const CCVCV: [bool; 5] = [true, true, false, true, false];

    if letters.len() != 5 || letters.iter().any(|&c| c == 'y' || c == '\'') {
        return false;
    }
    let shape: Vec<bool> = letters.iter().map(|&c| is_consonant(c)).collect();
    shape == CVCCV || shape == CCVCV
}
