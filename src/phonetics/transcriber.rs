use std::collections::BTreeSet;
use std::sync::Arc;

use super::canon::{canonicalize, WordCache};
use super::prosody::{annotate, Directive, Prosody};
use super::rules::RuleTable;
use super::stress::assign_stress;
use super::token::{Category, ParseResult};

const SPEAK_OPEN: &str = r#"<speak><prosody rate="x-slow"><s>"#;
const SPEAK_CLOSE: &str = r#"</s></prosody></speak>"#;

/// One `<phoneme>` span of the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhoneticUnit {
    /// Normalized words covered by the span, in utterance order.
    pub source_words: Vec<String>,
    /// Category of the token the unit was built from.
    pub category: Category,
    pub prefix_commands: Vec<Directive>,
    pub prefix: String,
    pub phonetic: String,
    pub postfix: String,
    pub postfix_commands: Vec<Directive>,
}

impl PhoneticUnit {
    pub fn new(word: String, category: Category, phonetic: String, prosody: Prosody) -> Self {
        Self {
            source_words: vec![word],
            category,
            prefix_commands: prosody.prefix_commands,
            prefix: prosody.prefix,
            phonetic,
            postfix: prosody.postfix,
            postfix_commands: prosody.postfix_commands,
        }
    }

    /// Whether `self` may be merged into the unit immediately to its right.
    pub fn can_fuse_into(&self, right: &PhoneticUnit) -> bool {
        self.category == Category::Particle
            && right.category == Category::Particle
            && self.postfix_commands.is_empty()
            && right.prefix_commands.is_empty()
            && right.prefix.is_empty()
    }

    /// Merge `left` into `self`: `self` takes over the left prefix side and
    /// its phonetic string becomes `left.phonetic + left.postfix + self.phonetic`.
    pub fn absorb(&mut self, left: PhoneticUnit) {
        self.prefix_commands = left.prefix_commands;
        self.prefix = left.prefix;
        self.phonetic = format!("{}{}{}", left.phonetic, left.postfix, self.phonetic);

        let mut words = left.source_words;
        words.append(&mut self.source_words);
        self.source_words = words;
    }

    /// SSML for the unit. Each directive is emitted at most once per side.
    pub fn render(&self) -> String {
        format!(
            r#"{}<phoneme alphabet="ipa" ph="{}{}{}">{}</phoneme>{}"#,
            render_directives(&self.prefix_commands),
            escape_xml(&self.prefix),
            escape_xml(&self.phonetic),
            escape_xml(&self.postfix),
            escape_xml(&self.source_words.join(" ")),
            render_directives(&self.postfix_commands),
        )
    }
}

fn render_directives(directives: &[Directive]) -> String {
    directives
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Directive::markup)
        .collect()
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Merge adjacent particle units in one left-to-right pass.
///
/// A unit produced by a merge is emitted as is and never considered again,
/// so a run of particles fuses in pairs: `a b c d` becomes `[a b] [c d]`.
pub fn fuse_particles(units: Vec<PhoneticUnit>) -> Vec<PhoneticUnit> {
    let mut fused = Vec::with_capacity(units.len());
    let mut iter = units.into_iter().peekable();

    while let Some(unit) = iter.next() {
        let merge = iter.peek().is_some_and(|right| unit.can_fuse_into(right));
        match iter.next_if(|_| merge) {
            Some(mut right) => {
                right.absorb(unit);
                fused.push(right);
            }
            None => fused.push(unit),
        }
    }

    fused
}

/// Render units into the final SSML document.
pub fn render_markup(units: &[PhoneticUnit]) -> String {
    let body: String = units.iter().map(PhoneticUnit::render).collect();
    let body = collapse_repeated_commas(&collapse_whitespace(&body));
    format!(
        "{SPEAK_OPEN}{body}{}{SPEAK_CLOSE}",
        Directive::WeakBreak.markup()
    )
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_run {
                out.push(' ');
            }
            in_run = true;
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out
}

/// Drop a comma (and one following space) when another comma comes next.
fn collapse_repeated_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while pos < chars.len() {
        if chars[pos] == ',' {
            let skip = if chars.get(pos + 1) == Some(&' ') { 2 } else { 1 };
            if chars.get(pos + skip) == Some(&',') {
                pos += skip;
                continue;
            }
        }
        out.push(chars[pos]);
        pos += 1;
    }

    out
}

/// Turns parsed utterances into SSML with IPA pronunciations.
///
/// Pure and synchronous; share one instance freely across threads.
#[derive(Debug, Clone)]
pub struct Transcriber {
    rules: Arc<RuleTable>,
}

impl Default for Transcriber {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcriber {
    /// Create a transcriber using the shared Lojban rule table.
    pub fn new() -> Self {
        Self {
            rules: RuleTable::lojban(),
        }
    }

    pub fn with_rules(rules: Arc<RuleTable>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    /// Transcribe one parsed utterance.
    ///
    /// Returns an empty string when the parse failed or no lexical token is
    /// left; callers must not request synthesis for it.
    pub fn transcribe(&self, parsed: &ParseResult) -> String {
        self.transcribe_with_cache(parsed, &mut WordCache::new())
    }

    /// Like [`Transcriber::transcribe`], reusing word results across calls.
    pub fn transcribe_with_cache(&self, parsed: &ParseResult, cache: &mut WordCache) -> String {
        let units = self.units(parsed, cache);
        if units.is_empty() {
            return String::new();
        }
        render_markup(&fuse_particles(units))
    }

    /// Phonetic units of the surviving tokens, before fusion.
    pub fn units(&self, parsed: &ParseResult, cache: &mut WordCache) -> Vec<PhoneticUnit> {
        if !parsed.is_success() {
            return Vec::new();
        }

        let tokens: Vec<(Category, String)> = parsed
            .lexical_tokens()
            .map(|t| (t.category, t.normalized()))
            .collect();

        tokens
            .iter()
            .enumerate()
            .map(|(idx, (category, word))| {
                let next = tokens.get(idx + 1).map(|(_, w)| w.as_str());
                let phonetic = cache.get_or_insert_with(word, || self.phonetic_word(word));
                PhoneticUnit::new(word.clone(), *category, phonetic, annotate(word, next))
            })
            .collect()
    }

    /// IPA for a single normalized word: canonicalize, stress, transliterate.
    pub fn phonetic_word(&self, word: &str) -> String {
        self.rules.transliterate(&assign_stress(&canonicalize(word)))
    }
}
