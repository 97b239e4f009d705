//! Post-processing for model output.
//!
//! Summarization models occasionally emit filler words that never appeared in the source, or
//! characters from a foreign script. [`TextNormalizer::clean`] strips both and tidies whitespace.
//! The allow-list is chosen per deployment through [`Alphabet`].

use regex::Regex;
use serde::Deserialize;

/// Words removed from every summary by default.
pub const DEFAULT_BLOCKLIST: &[&str] = &[
    "guiltful",
    "grotesque",
    "enthusiastically",
    "worrisome",
    "tahminiably",
];

const TURKISH_LETTERS: &str = "ğĞüÜşŞıİöÖçÇ";
const ALLOWED_PUNCTUATION: &str = r#".,;!?'"()\[\]\-"#;

/// Letters kept by the normalizer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alphabet {
    /// ASCII letters plus the Turkish-specific letters.
    #[default]
    Turkish,
    /// ASCII letters only.
    Latin,
    /// Any Unicode letter, combining mark, or number.
    Unicode,
}

impl std::str::FromStr for Alphabet {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "turkish" | "tr" => Ok(Self::Turkish),
            "latin" | "ascii" => Ok(Self::Latin),
            "unicode" | "any" => Ok(Self::Unicode),
            _ => Err(()),
        }
    }
}

impl Alphabet {
    fn disallowed_pattern(self) -> String {
        let letters = match self {
            Self::Turkish => format!("a-zA-Z0-9{TURKISH_LETTERS}"),
            Self::Latin => "a-zA-Z0-9".to_string(),
            Self::Unicode => r"\p{L}\p{M}\p{N}".to_string(),
        };
        format!(r"[^{letters}\s{ALLOWED_PUNCTUATION}]")
    }
}

/// Strips blocklisted words and out-of-alphabet characters from summaries.
#[derive(Clone, Debug)]
pub struct TextNormalizer {
    blocklist: Option<Regex>,
    disallowed: Regex,
    whitespace: Regex,
}

impl TextNormalizer {
    /// Build a normalizer for `alphabet` that removes every word in `blocklist`.
    pub fn new<S: AsRef<str>>(alphabet: Alphabet, blocklist: &[S]) -> Self {
        let words: Vec<String> = blocklist
            .iter()
            .map(|word| word.as_ref().trim())
            .filter(|word| !word.is_empty())
            .map(regex::escape)
            .collect();
        let blocklist = if words.is_empty() {
            None
        } else {
            Some(
                Regex::new(&format!(r"(?i)\b(?:{})\b", words.join("|")))
                    .expect("escaped blocklist is a valid pattern"),
            )
        };

        Self {
            blocklist,
            disallowed: Regex::new(&alphabet.disallowed_pattern())
                .expect("allow-list pattern is valid"),
            whitespace: Regex::new(r"\s+").expect("whitespace pattern is valid"),
        }
    }

    /// Clean a model-produced string. Infallible and idempotent.
    pub fn clean(&self, text: &str) -> String {
        let mut current = text.to_string();
        // Dropping a character can join two fragments into a blocked word; repeat until stable.
        loop {
            let without_blocked = match &self.blocklist {
                Some(pattern) => pattern.replace_all(&current, "").into_owned(),
                None => current.clone(),
            };
            let filtered = self
                .disallowed
                .replace_all(&without_blocked, "")
                .into_owned();
            if filtered == current {
                break;
            }
            current = filtered;
        }

        self.whitespace
            .replace_all(&current, " ")
            .trim()
            .to_string()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new(Alphabet::Turkish, DEFAULT_BLOCKLIST)
    }
}
