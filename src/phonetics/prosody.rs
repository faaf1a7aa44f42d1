/// Particles that open a new sentence or paragraph.
pub const SENTENCE_SEPARATORS: &[&str] = &["ni'o", ".i", "no'i"];
/// Question particles; a short pause is placed before them.
pub const QUESTION_PARTICLES: &[&str] = &["ma", "mo", "xu"];
/// Elidable terminators; a short pause follows unless another terminator does.
pub const TERMINATORS: &[&str] = &[
    "ku", "kei", "vau", "ku'o", "li'u", "le'u", "ge'u", "zo'u",
];
/// Particles pronounced with a trailing glottal stop.
pub const GLOTTAL_PARTICLES: &[&str] = &["cu"];

pub const GLOTTAL_STOP: &str = "ʔ";

/// Prosodic markup placed around a phonetic unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Directive {
    SentenceBreak,
    WeakBreak,
}

impl Directive {
    /// SSML emitted for the directive.
    pub fn markup(self) -> &'static str {
        match self {
            Directive::SentenceBreak => "</s><s>",
            Directive::WeakBreak => r#"<break time="1ms" strength="x-weak" />"#,
        }
    }
}

/// Directives and literal affixes for one word.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Prosody {
    pub prefix_commands: Vec<Directive>,
    pub prefix: String,
    pub postfix: String,
    pub postfix_commands: Vec<Directive>,
}

/// Prosody of a normalized `word`, given the normalized word after it.
///
/// A terminator only gets its trailing pause when a non-terminator follows;
/// at the end of the utterance the closing break of the sentence covers it.
pub fn annotate(word: &str, next: Option<&str>) -> Prosody {
    let mut prosody = Prosody::default();

    if SENTENCE_SEPARATORS.contains(&word) {
        prosody.prefix_commands.push(Directive::SentenceBreak);
    }
    if QUESTION_PARTICLES.contains(&word) {
        prosody.prefix_commands.push(Directive::WeakBreak);
    }
    if TERMINATORS.contains(&word) && next.is_some_and(|n| !TERMINATORS.contains(&n)) {
        prosody.postfix_commands.push(Directive::WeakBreak);
    }
    if GLOTTAL_PARTICLES.contains(&word) {
        prosody.postfix.push_str(GLOTTAL_STOP);
    }

    prosody
}
