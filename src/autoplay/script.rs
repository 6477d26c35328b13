//! Autoplay step lists.

use std::time::Duration;

use crate::catalog::{resolve_fields, Language, WordRecord};
use crate::config::AutoplayConfig;

/// Screen callbacks a script can fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hook {
    /// Show the hidden translation.
    Reveal,
    /// Move on to the next word.
    Advance,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Play(String),
    Wait(Duration),
    Invoke(Hook),
}

/// An ordered step list tagged with the id of the word it was built for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceScript {
    pub generation: String,
    pub steps: Vec<Step>,
}

/// Build the hands-free listening script for `word` in `lang`.
///
/// ```text
/// alternate ─ gap ─ normal ─ gap ─ secondary ─ gap ─ Reveal ─ gloss ─ gap ─ Advance
/// ```
///
/// Clips the word does not have are left out; the waits stay, so the pacing
/// of a word with missing recordings matches a complete one.
pub fn build_script(word: &WordRecord, lang: Language, config: &AutoplayConfig) -> SequenceScript {
    let target = resolve_fields(word, lang).clips;
    let secondary = config
        .secondary_language
        .filter(|l| *l != lang)
        .and_then(|l| resolve_fields(word, l).clips.normal);

    fn play(steps: &mut Vec<Step>, clip: Option<&str>) {
        if let Some(clip) = clip {
            steps.push(Step::Play(clip.to_string()));
        }
    }

    let mut steps = Vec::with_capacity(10);

    play(&mut steps, target.alternate);
    steps.push(Step::Wait(config.alternate_gap()));
    play(&mut steps, target.normal);
    steps.push(Step::Wait(config.normal_gap()));
    play(&mut steps, secondary);
    steps.push(Step::Wait(config.secondary_gap()));
    steps.push(Step::Invoke(Hook::Reveal));
    play(&mut steps, target.gloss);
    steps.push(Step::Wait(config.gloss_gap()));
    steps.push(Step::Invoke(Hook::Advance));

    SequenceScript {
        generation: word.id.clone(),
        steps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClipSet, LanguageFields};

    fn ms(n: u64) -> Step {
        Step::Wait(Duration::from_millis(n))
    }

    fn play(clip: &str) -> Step {
        Step::Play(clip.into())
    }

    fn full_word() -> WordRecord {
        WordRecord::new("w7", "coffee")
            .with_gloss_clip("en_coffee.mp3")
            .with_language(
                Language::Japanese,
                LanguageFields {
                    text: "コーヒー".into(),
                    phonetic: "koohii".into(),
                    clips: ClipSet {
                        normal: Some("ja_coffee.mp3".into()),
                        slow: None,
                        alternate: Some("ja_coffee_f.mp3".into()),
                    },
                },
            )
            .with_language(
                Language::Spanish,
                LanguageFields {
                    text: "café".into(),
                    phonetic: "kafe".into(),
                    clips: ClipSet {
                        normal: Some("es_cafe.mp3".into()),
                        ..ClipSet::default()
                    },
                },
            )
    }

    #[test]
    fn full_script_order() {
        let script = build_script(&full_word(), Language::Japanese, &AutoplayConfig::default());

        assert_eq!(script.generation, "w7");
        assert_eq!(
            script.steps,
            vec![
                play("ja_coffee_f.mp3"),
                ms(1000),
                play("ja_coffee.mp3"),
                ms(2000),
                play("es_cafe.mp3"),
                ms(1000),
                Step::Invoke(Hook::Reveal),
                play("en_coffee.mp3"),
                ms(2000),
                Step::Invoke(Hook::Advance),
            ]
        );
    }

    #[test]
    fn absent_clips_are_omitted() {
        let word = WordRecord::new("w8", "tea");
        let script = build_script(&word, Language::Korean, &AutoplayConfig::default());

        assert!(!script.steps.iter().any(|s| matches!(s, Step::Play(_))));
        assert_eq!(
            script.steps,
            vec![
                ms(1000),
                ms(2000),
                ms(1000),
                Step::Invoke(Hook::Reveal),
                ms(2000),
                Step::Invoke(Hook::Advance),
            ]
        );
    }

    #[test]
    fn secondary_language_can_be_disabled() {
        let config = AutoplayConfig {
            secondary_language: None,
            ..AutoplayConfig::default()
        };
        let script = build_script(&full_word(), Language::Japanese, &config);
        assert!(!script.steps.contains(&play("es_cafe.mp3")));
    }
}
