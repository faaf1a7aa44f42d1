use std::collections::HashMap;

use super::rules::is_plain_vowel;

/// Glyph for a consonantal `i` (the `j` sound), distinct from the letter `j`.
pub const GLIDE_I: char = 'ɩ';
/// Glyph for a consonantal `u`.
pub const GLIDE_U: char = 'w';

const DIPHTHONGS: &[(&str, &str)] = &[("au", "ḁ"), ("ai", "ą"), ("ei", "ę"), ("oi", "ǫ")];

/// Rewrite a normalized word into the orthography the rule table expects.
///
/// In order:
/// 1. `u`/`i` before a vowel become glides, first where a vowel precedes
///    them, then everywhere else
/// 2. `au`, `ai`, `ei`, `oi` collapse to single glyphs
/// 3. the apostrophe becomes `h`
pub fn canonicalize(word: &str) -> String {
    let mut chars: Vec<char> = word.chars().collect();
    chars = glide(&chars, 'u', GLIDE_U, true);
    chars = glide(&chars, 'i', GLIDE_I, true);
    chars = glide(&chars, 'u', GLIDE_U, false);
    chars = glide(&chars, 'i', GLIDE_I, false);

    let mut text: String = chars.into_iter().collect();
    for (pair, glyph) in DIPHTHONGS {
        text = text.replace(pair, glyph);
    }
    text.replace('\'', "h")
}

/// Replace `close` with `glide` wherever it is followed by a plain vowel.
///
/// Matches do not overlap: the vowel after a replaced glide is consumed with
/// it and cannot start another match. With `after_vowel_only`, the preceding
/// character (in the input) must also be a plain vowel.
fn glide(chars: &[char], close: char, glide: char, after_vowel_only: bool) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len());
    let mut pos = 0;

    while pos < chars.len() {
        let c = chars[pos];
        let next = chars.get(pos + 1).copied();
        let preceded = pos > 0 && is_plain_vowel(chars[pos - 1]);

        if c == close && next.is_some_and(is_plain_vowel) && (!after_vowel_only || preceded) {
            out.push(glide);
            out.extend(next);
            pos += 2;
        } else {
            out.push(c);
            pos += 1;
        }
    }

    out
}

/// Per-run memo of word → phonetic string.
///
/// Owned by whoever drives a batch of transcriptions; never shared globally.
#[derive(Debug, Default)]
pub struct WordCache {
    entries: HashMap<String, String>,
}

impl WordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached value for `word`, computing and storing it on a miss.
    pub fn get_or_insert_with(&mut self, word: &str, compute: impl FnOnce() -> String) -> String {
        if let Some(hit) = self.entries.get(word) {
            return hit.clone();
        }
        let value = compute();
        self.entries.insert(word.to_string(), value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::{canonicalize, WordCache};

    #[test]
    fn leaves_plain_words_alone() {
        assert_eq!(canonicalize("klama"), "klama");
        assert_eq!(canonicalize(".djan."), ".djan.");
    }

    #[test]
    fn word_initial_glides() {
        assert_eq!(canonicalize("iabu"), "ɩabu");
        assert_eq!(canonicalize("uenzi"), "wenzi");
    }

    #[test]
    fn post_vocalic_glides_come_first() {
        // the u after a is a glide; the i before it never sees a vowel
        assert_eq!(canonicalize("aiua"), "ąwa");
        assert_eq!(canonicalize(".uu"), ".wu");
    }

    #[test]
    fn diphthongs_collapse() {
        assert_eq!(canonicalize("gauxai"), "gḁxą");
        assert_eq!(canonicalize("sei"), "sę");
        assert_eq!(canonicalize("coi"), "cǫ");
    }

    #[test]
    fn apostrophe_becomes_h() {
        assert_eq!(canonicalize("ni'o"), "niho");
        assert_eq!(canonicalize("ku'o"), "kuho");
    }

    #[test]
    fn unmatched_input_passes_through() {
        assert_eq!(canonicalize("§x1"), "§x1");
        assert_eq!(canonicalize(""), "");
    }

    #[test]
    fn cache_computes_once_per_word() {
        let mut cache = WordCache::new();
        let mut calls = 0;
        for _ in 0..3 {
            let value = cache.get_or_insert_with("coi", || {
                calls += 1;
                "ʃɔj".to_string()
            });
            assert_eq!(value, "ʃɔj");
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
    }
}
