use super::rules::{is_consonant, is_vowel};

/// IPA primary stress mark.
pub const STRESS_MARK: char = 'ˈ';

/// Split a canonical word before every vowel.
///
/// A vowel at the very start does not produce an empty leading segment, so
/// every segment but the first begins with a vowel.
pub fn split_vowel_onsets(word: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    for (idx, c) in word.char_indices() {
        if idx > 0 && is_vowel(c) {
            segments.push(&word[start..idx]);
            start = idx;
        }
    }
    if start < word.len() {
        segments.push(&word[start..]);
    }
    segments
}

/// Insert a primary stress mark into a canonical word.
///
/// When the last two vowel-onset segments both begin with a vowel, the mark
/// goes before the consonant (or `h`) closing everything in front of them,
/// or at the very start when nothing is in front. Otherwise the word is
/// returned unchanged and the synthesizer's default stress applies.
pub fn assign_stress(word: &str) -> String {
    let segments = split_vowel_onsets(word);
    if segments.len() < 2 {
        return word.to_string();
    }

    let (head, tail) = segments.split_at(segments.len() - 2);
    let starts_with_vowel = |s: &str| s.chars().next().is_some_and(is_vowel);
    if !tail.iter().all(|s| starts_with_vowel(s)) {
        return word.to_string();
    }

    let head: String = head.concat();
    let tail: String = tail.concat();
    if head.is_empty() {
        return format!("{STRESS_MARK}{tail}");
    }

    match head.char_indices().next_back() {
        Some((idx, c)) if is_consonant(c) || c == 'h' || c == '\'' => {
            format!("{}{STRESS_MARK}{}{tail}", &head[..idx], &head[idx..])
        }
        _ => word.to_string(),
    }
}
