//! Alias table: common mis-hearings → the catalog's canonical spelling.

use std::collections::HashMap;
use std::path::Path;

use super::VoiceError;

/// Mis-hearings the recognizer produces for catalog words.
const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("noodles", "noodle"),
    ("coffees", "coffee"),
    ("meet", "meat"),
    ("guy", "chicken"),
    ("moo", "pork"),
    ("neung", "one"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasTable {
    map: HashMap<String, String>,
}

impl AliasTable {
    pub fn empty() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Built-in table extended with the JSON object at `path`.
    ///
    /// ```json
    /// { "kohi": "coffee", "bia": "beer" }
    /// ```
    pub fn load_from(path: &Path) -> Result<Self, VoiceError> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| VoiceError::Aliases(format!("{}: {e}", path.display())))?;
        let extra: HashMap<String, String> = serde_json::from_str(&data)
            .map_err(|e| VoiceError::Aliases(format!("{}: {e}", path.display())))?;

        let mut table = Self::default();
        table.extend(extra);
        log::info!("voice: {} aliases after merging {}", table.len(), path.display());
        Ok(table)
    }

    /// Add entries; keys and values are lowercased.  Later entries win.
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (k, v) in entries {
            self.map
                .insert(k.as_ref().trim().to_lowercase(), v.as_ref().trim().to_lowercase());
        }
    }

    /// Canonical spelling of a normalized transcript, or the input itself.
    pub fn canonicalize<'a>(&'a self, text: &'a str) -> &'a str {
        self.map.get(text).map(String::as_str).unwrap_or(text)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl Default for AliasTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.extend(BUILTIN_ALIASES.iter().copied());
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn builtin_aliases() {
        let table = AliasTable::default();
        assert_eq!(table.canonicalize("noodles"), "noodle");
        assert_eq!(table.canonicalize("neung"), "one");
        assert_eq!(table.canonicalize("water"), "water");
    }

    #[test]
    fn file_entries_extend_and_override() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, r#"{ "Kohi": "coffee", "guy": "gai" }"#).unwrap();

        let table = AliasTable::load_from(&path).unwrap();
        assert_eq!(table.canonicalize("kohi"), "coffee");
        assert_eq!(table.canonicalize("guy"), "gai");
        assert_eq!(table.canonicalize("moo"), "pork");
    }

    #[test]
    fn bad_file_is_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("aliases.json");
        std::fs::write(&path, "[1, 2]").unwrap();

        assert!(matches!(
            AliasTable::load_from(&path),
            Err(VoiceError::Aliases(_))
        ));
    }
}
