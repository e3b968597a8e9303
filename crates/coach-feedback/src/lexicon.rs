//! Word lists used to detect generic coaching feedback.
//!
//! The lists were tuned against one model's response style and are expected
//! to drift when the model changes, so they can be loaded from a JSON file
//! (`FEEDBACK_LEXICON_PATH`) instead of the compiled-in defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{FeedbackError, FeedbackResult};

const DEFAULT_GENERIC_PHRASES: [&str; 18] = [
    "form looks good",
    "keep practicing",
    "no major issues",
    "great job",
    "solid swing",
    "good job",
    "nice swing",
    "well done",
    "keep it up",
    "looks great",
    "overall good",
    "good form",
    "great swing",
    "nice work",
    "keep up the good work",
    "no issues",
    "nothing to fix",
    "looks solid",
];

const DEFAULT_CORRECTIVE_VERBS: [&str; 25] = [
    "fix",
    "adjust",
    "correct",
    "lower",
    "raise",
    "tuck",
    "rotate",
    "shift",
    "bend",
    "straighten",
    "drive",
    "coil",
    "extend",
    "flex",
    "load",
    "transfer",
    "stride",
    "separate",
    "brace",
    "square",
    "open",
    "close",
    "widen",
    "shorten",
    "tilt",
];

/// Thresholds and word lists for the genericity classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenericityLexicon {
    /// Minimum trimmed character count
    pub min_length: usize,
    /// Minimum number of non-empty sentences
    pub min_sentences: usize,
    /// Praise phrases that mark a response as generic
    pub generic_phrases: Vec<String>,
    /// At least one of these must appear for a response to be specific
    pub corrective_verbs: Vec<String>,
}

impl Default for GenericityLexicon {
    fn default() -> Self {
        Self {
            min_length: 30,
            min_sentences: 1,
            generic_phrases: DEFAULT_GENERIC_PHRASES.iter().map(|s| s.to_string()).collect(),
            corrective_verbs: DEFAULT_CORRECTIVE_VERBS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl GenericityLexicon {
    /// Load a lexicon from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> FeedbackResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        let lexicon: GenericityLexicon = serde_json::from_str(&raw)?;
        let lexicon = lexicon.normalized()?;

        info!(
            path = %path.display(),
            phrases = lexicon.generic_phrases.len(),
            verbs = lexicon.corrective_verbs.len(),
            "Loaded feedback lexicon"
        );
        Ok(lexicon)
    }

    /// Use `FEEDBACK_LEXICON_PATH` when set, otherwise the defaults.
    pub fn from_env() -> FeedbackResult<Self> {
        match std::env::var("FEEDBACK_LEXICON_PATH") {
            Ok(path) if !path.trim().is_empty() => Self::from_file(path.trim()),
            _ => Ok(Self::default()),
        }
    }

    /// Lower-case and trim entries, drop blanks, reject an empty verb list.
    fn normalized(self) -> FeedbackResult<Self> {
        let clean = |list: Vec<String>| -> Vec<String> {
            list.into_iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };

        let lexicon = Self {
            min_length: self.min_length,
            min_sentences: self.min_sentences,
            generic_phrases: clean(self.generic_phrases),
            corrective_verbs: clean(self.corrective_verbs),
        };

        if lexicon.corrective_verbs.is_empty() {
            return Err(FeedbackError::config(
                "feedback lexicon must list at least one corrective verb",
            ));
        }
        Ok(lexicon)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_sizes() {
        let lexicon = GenericityLexicon::default();
        assert_eq!(lexicon.generic_phrases.len(), 18);
        assert_eq!(lexicon.corrective_verbs.len(), 25);
        assert_eq!(lexicon.min_length, 30);
    }

    #[test]
    fn test_from_file_partial_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"generic_phrases": ["  Looks Fine  ", ""], "min_length": 40}}"#
        )
        .unwrap();

        let lexicon = GenericityLexicon::from_file(file.path()).unwrap();
        assert_eq!(lexicon.generic_phrases, vec!["looks fine".to_string()]);
        assert_eq!(lexicon.min_length, 40);
        assert_eq!(lexicon.corrective_verbs.len(), 25);
    }

    #[test]
    fn test_from_file_rejects_empty_verbs() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"corrective_verbs": []}}"#).unwrap();

        let err = GenericityLexicon::from_file(file.path()).unwrap_err();
        assert!(matches!(err, FeedbackError::Config(_)));
    }

    #[test]
    fn test_from_file_missing() {
        let err = GenericityLexicon::from_file("/nonexistent/lexicon.json").unwrap_err();
        assert!(matches!(err, FeedbackError::Io(_)));
    }
}
