//! Field resolver: which text and clips a screen shows for a target language.

use super::{Language, WordRecord};

/// Clip ids to use for one word in one target language.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClipKeys<'a> {
    pub normal: Option<&'a str>,
    pub slow: Option<&'a str>,
    pub alternate: Option<&'a str>,
    /// English gloss clip; independent of the target language.
    pub gloss: Option<&'a str>,
}

/// Everything a practice screen needs to present a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFields<'a> {
    pub text: &'a str,
    pub phonetic: &'a str,
    pub clips: ClipKeys<'a>,
}

/// Resolve display text, phonetic text and clip ids of `word` for `lang`.
///
/// Missing language data yields empty strings and no clips rather than an
/// error, so screens can still show the gloss.
///
/// ```
/// use vocab_trainer::catalog::{resolve_fields, Language, WordRecord};
///
/// let word = WordRecord::new("w1", "water");
/// let fields = resolve_fields(&word, Language::Korean);
/// assert_eq!(fields.text, "");
/// assert!(fields.clips.normal.is_none());
/// ```
pub fn resolve_fields(word: &WordRecord, lang: Language) -> ResolvedFields<'_> {
    let gloss = word.gloss_clip.as_deref();

    match word.fields_for(lang) {
        Some(f) => ResolvedFields {
            text: &f.text,
            phonetic: &f.phonetic,
            clips: ClipKeys {
                normal: f.clips.normal.as_deref(),
                slow: f.clips.slow.as_deref(),
                alternate: f.clips.alternate.as_deref(),
                gloss,
            },
        },
        None => ResolvedFields {
            text: "",
            phonetic: "",
            clips: ClipKeys {
                gloss,
                ..ClipKeys::default()
            },
        },
    }
}
