//! Transcript cleanup.

/// Lowercase `raw`, drop punctuation and symbols, collapse whitespace and
/// strip leading filler phrases.
///
/// Letters of any script are kept, so kana and hangul survive, and so are
/// the combining marks written on them (decomposed accents, Thai tone
/// marks, kana voicing marks).  A filler is only stripped when more text
/// follows it.
///
/// ```
/// use vocab_trainer::voice::normalize;
///
/// let fillers = vec!["i said".to_string(), "please".to_string()];
/// assert_eq!(normalize("I said, Noodles!", &fillers), "noodles");
/// assert_eq!(normalize("  please  ", &fillers), "please");
/// ```
pub fn normalize(raw: &str, fillers: &[String]) -> String {
    let cleaned: String = raw
        .to_lowercase()
        .chars()
        .filter(|&c| c.is_alphanumeric() || c.is_whitespace() || is_combining_mark(c))
        .collect();
    let mut text = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    while let Some(rest) = strip_filler(&text, fillers) {
        text = rest.to_string();
    }
    text
}

/// Combining mark blocks of the scripts the catalog is written in.
const COMBINING_MARKS: &[(char, char)] = &[
    ('\u{0300}', '\u{036F}'), // combining diacritical marks
    ('\u{0483}', '\u{0489}'), // cyrillic
    ('\u{0591}', '\u{05BD}'), // hebrew points
    ('\u{064B}', '\u{065F}'), // arabic harakat
    ('\u{0900}', '\u{0903}'), // devanagari
    ('\u{093A}', '\u{094F}'),
    ('\u{0E31}', '\u{0E31}'), // thai
    ('\u{0E34}', '\u{0E3A}'),
    ('\u{0E47}', '\u{0E4E}'),
    ('\u{0EB1}', '\u{0EB1}'), // lao
    ('\u{0EB4}', '\u{0EBC}'),
    ('\u{0EC8}', '\u{0ECD}'),
    ('\u{1AB0}', '\u{1AFF}'),
    ('\u{1DC0}', '\u{1DFF}'),
    ('\u{20D0}', '\u{20FF}'),
    ('\u{3099}', '\u{309A}'), // kana voicing marks
    ('\u{FE20}', '\u{FE2F}'),
];

fn is_combining_mark(c: char) -> bool {
    COMBINING_MARKS
        .iter()
        .any(|&(lo, hi)| (lo..=hi).contains(&c))
}

fn strip_filler<'a>(text: &'a str, fillers: &[String]) -> Option<&'a str> {
    fillers.iter().find_map(|filler| {
        let filler = filler.trim();
        if filler.is_empty() {
            return None;
        }
        text.strip_prefix(filler)
            .and_then(|rest| rest.strip_prefix(' '))
            .filter(|rest| !rest.is_empty())
    })
}
