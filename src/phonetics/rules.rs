use std::cmp::Reverse;
use std::sync::{Arc, OnceLock};

/// Vowels after canonicalization: the six plain vowels plus the diphthong glyphs.
pub const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y', 'ą', 'ę', 'ǫ', 'ḁ'];

/// Plain vowel letters of the Lojban alphabet.
pub fn is_plain_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y')
}

/// Plain vowel or one of the canonical diphthong glyphs.
pub fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

/// Lojban consonant letters (the glottal `h`/`'` is not one of them).
pub fn is_consonant(c: char) -> bool {
    matches!(
        c,
        'b' | 'd' | 'g' | 'j' | 'v' | 'z' | 'c' | 'f' | 'k' | 'p' | 's' | 't' | 'x' | 'l' | 'm'
            | 'n' | 'r'
    )
}

/// Right context a rule requires after its literal pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookahead {
    Anywhere,
    /// Next character exists and is a vowel.
    BeforeVowel,
    /// Next character exists and is not a vowel.
    BeforeNonVowel,
}

impl Lookahead {
    fn accepts(self, next: Option<char>) -> bool {
        match self {
            Lookahead::Anywhere => true,
            Lookahead::BeforeVowel => next.is_some_and(is_vowel),
            Lookahead::BeforeNonVowel => next.is_some_and(|c| !is_vowel(c)),
        }
    }
}

/// One pattern-to-IPA mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleEntry {
    pub pattern: &'static str,
    pub context: Lookahead,
    pub replacement: &'static str,
}

impl RuleEntry {
    pub const fn new(pattern: &'static str, replacement: &'static str) -> Self {
        Self {
            pattern,
            context: Lookahead::Anywhere,
            replacement,
        }
    }

    pub const fn with_context(
        pattern: &'static str,
        context: Lookahead,
        replacement: &'static str,
    ) -> Self {
        Self {
            pattern,
            context,
            replacement,
        }
    }

    /// Number of characters consumed on a match.
    pub fn len(&self) -> usize {
        self.pattern.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }

    /// Whether the rule matches at the start of `rest`.
    pub fn matches(&self, rest: &[char]) -> bool {
        let mut consumed = 0;
        for expected in self.pattern.chars() {
            if rest.get(consumed) != Some(&expected) {
                return false;
            }
            consumed += 1;
        }
        self.context.accepts(rest.get(consumed).copied())
    }
}

/// Lojban orthography to IPA, in declaration order.
///
/// Length `ː` and ASCII `:` are both used on purpose; the synthesizer reads
/// them differently.
const LOJBAN_RULES: &[RuleEntry] = &[
    RuleEntry::new("a", "aː"),
    RuleEntry::new("e", "ɛ:"),
    RuleEntry::new("i", "i:"),
    RuleEntry::new("o", "ɔ:"),
    RuleEntry::new("u", "u:"),
    RuleEntry::new("y", "ə"),
    RuleEntry::new("ą", "aj"),
    RuleEntry::new("ę", "ɛj"),
    RuleEntry::new("ǫ", "ɔj"),
    RuleEntry::new("ḁ", "aʊ"),
    RuleEntry::new("ɩa", "jaː"),
    RuleEntry::new("ɩe", "jɛ:"),
    RuleEntry::new("ɩi", "ji:"),
    RuleEntry::new("ɩo", "jɔ:"),
    RuleEntry::new("ɩu", "ju:"),
    RuleEntry::new("ɩy", "jə"),
    RuleEntry::new("ɩ", "j"),
    RuleEntry::new("wa", "waː"),
    RuleEntry::new("we", "wɛ:"),
    RuleEntry::new("wi", "wi:"),
    RuleEntry::new("wo", "wɔ:"),
    RuleEntry::new("wu", "wu:"),
    RuleEntry::new("wy", "wə"),
    RuleEntry::new("w", "w"),
    RuleEntry::new("c", "ʃ"),
    RuleEntry::new("j", "ʒ"),
    RuleEntry::new("s", "s"),
    RuleEntry::new("z", "z"),
    RuleEntry::new("f", "f"),
    RuleEntry::new("ev", "ɛ:ʔv"),
    RuleEntry::new("v", "v"),
    RuleEntry::new("x", "x"),
    RuleEntry::new("'", "h"),
    RuleEntry::new("dj", "dʒ"),
    RuleEntry::new("tc", "tʃ"),
    RuleEntry::new("dz", "ʣ"),
    RuleEntry::new("ts", "ʦ"),
    RuleEntry::with_context("r", Lookahead::BeforeNonVowel, "rr."),
    RuleEntry::with_context("r", Lookahead::BeforeVowel, "ɹ"),
    RuleEntry::new("n", "n"),
    RuleEntry::new("m", "m"),
    RuleEntry::new("l", "l"),
    RuleEntry::new("b", "b"),
    RuleEntry::new("d", "d"),
    RuleEntry::new("g", "g"),
    RuleEntry::new("k", "k"),
    RuleEntry::new("p", "p"),
    RuleEntry::new("t", "t"),
    RuleEntry::new("h", "h"),
    RuleEntry::new(".", "."),
];

static LOJBAN_TABLE: OnceLock<Arc<RuleTable>> = OnceLock::new();

/// Immutable rule list, longest pattern first.
///
/// Sorted once at construction with a stable sort, so rules of equal length
/// keep their declaration order.
#[derive(Debug, Clone)]
pub struct RuleTable {
    entries: Vec<RuleEntry>,
}

impl RuleTable {
    pub fn new(mut entries: Vec<RuleEntry>) -> Self {
        entries.retain(|e| !e.is_empty());
        entries.sort_by_key(|e| Reverse(e.len()));
        Self { entries }
    }

    /// The shared Lojban table.
    pub fn lojban() -> Arc<RuleTable> {
        LOJBAN_TABLE
            .get_or_init(|| Arc::new(RuleTable::new(LOJBAN_RULES.to_vec())))
            .clone()
    }

    pub fn entries(&self) -> &[RuleEntry] {
        &self.entries
    }

    /// First rule (longest, then earliest declared) matching at the start of `rest`.
    pub fn longest_match(&self, rest: &[char]) -> Option<&RuleEntry> {
        self.entries.iter().find(|e| e.matches(rest))
    }

    /// Scan left to right, replacing the longest matching pattern at each
    /// position. Characters with no rule are copied through one at a time.
    pub fn transliterate(&self, word: &str) -> String {
        let chars: Vec<char> = word.chars().collect();
        let mut out = String::with_capacity(word.len() * 2);
        let mut pos = 0;

        while pos < chars.len() {
            match self.longest_match(&chars[pos..]) {
                Some(rule) => {
                    out.push_str(rule.replacement);
                    pos += rule.len();
                }
                None => {
                    out.push(chars[pos]);
                    pos += 1;
                }
            }
        }

        out
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        RuleTable::new(LOJBAN_RULES.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::{Lookahead, RuleEntry, RuleTable};

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn table_is_sorted_longest_first() {
        let table = RuleTable::lojban();
        let lens: Vec<usize> = table.entries().iter().map(RuleEntry::len).collect();
        assert!(lens.windows(2).all(|w| w[0] >= w[1]));
        assert_eq!(table.entries()[0].pattern, "ɩa");
    }

    #[test]
    fn ties_keep_declaration_order() {
        let table = RuleTable::new(vec![
            RuleEntry::new("x", "first"),
            RuleEntry::new("ab", "long"),
            RuleEntry::new("x", "second"),
        ]);
        assert_eq!(table.longest_match(&chars("x")).unwrap().replacement, "first");
        assert_eq!(table.longest_match(&chars("ab")).unwrap().replacement, "long");
    }

    #[test]
    fn longest_pattern_wins() {
        let table = RuleTable::lojban();
        assert_eq!(table.transliterate("dj"), "dʒ");
        assert_eq!(table.transliterate("ev"), "ɛ:ʔv");
        assert_eq!(table.transliterate("ɩa"), "jaː");
    }

    #[test]
    fn r_depends_on_following_character() {
        let table = RuleTable::lojban();
        assert_eq!(table.transliterate("ra"), "ɹaː");
        assert_eq!(table.transliterate("rk"), "rr.k");
        // no rule for a word-final r
        assert_eq!(table.transliterate("r"), "r");
    }

    #[test]
    fn unknown_characters_pass_through() {
        let table = RuleTable::lojban();
        assert_eq!(table.transliterate("kˈla"), "kˈlaː");
        assert_eq!(table.transliterate("q!"), "q!");
    }

    #[test]
    fn unmatched_character_advances_by_one() {
        let table = RuleTable::lojban();
        // a two-character match followed by an unmatched mark must not skip the next letter
        assert_eq!(table.transliterate("djˈba"), "dʒˈbaː");
    }

    #[test]
    fn transliteration_is_deterministic() {
        let table = RuleTable::lojban();
        for word in ["kˈlaːma", ".ɩaˈbu", "ḁwi", "ˈmleca", ".djan."] {
            assert_eq!(table.transliterate(word), table.transliterate(word));
        }
    }

    #[test]
    fn lookahead_requires_a_next_character() {
        let rule = RuleEntry::with_context("r", Lookahead::BeforeVowel, "ɹ");
        assert!(rule.matches(&chars("ro")));
        assert!(!rule.matches(&chars("r")));
        assert!(!rule.matches(&chars("rt")));
    }
}
