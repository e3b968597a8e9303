//! Genericity classifier for candidate coaching feedback.
//!
//! Vision-model coaching answers fail in two ways: too short to say anything,
//! or fluent praise without a correction. Both show up as lexical signals, so
//! the classifier works on phrase and verb lists rather than parsing meaning.

use std::fmt;

use crate::lexicon::GenericityLexicon;
use crate::normalizer::split_sentences;

/// Classification of a candidate, naming the first rule that fired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Specific,
    TooShort,
    TooFewSentences,
    GenericPhrase(String),
    NoCorrectiveVerb,
}

impl Verdict {
    pub fn is_generic(&self) -> bool {
        !matches!(self, Verdict::Specific)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Specific => write!(f, "specific"),
            Verdict::TooShort => write!(f, "too short"),
            Verdict::TooFewSentences => write!(f, "too few sentences"),
            Verdict::GenericPhrase(phrase) => write!(f, "generic phrase '{}'", phrase),
            Verdict::NoCorrectiveVerb => write!(f, "no corrective verb"),
        }
    }
}

/// Lexical classifier built from a [`GenericityLexicon`].
#[derive(Debug, Clone, Default)]
pub struct FeedbackValidator {
    lexicon: GenericityLexicon,
}

impl FeedbackValidator {
    pub fn new(lexicon: GenericityLexicon) -> Self {
        Self { lexicon }
    }

    pub fn lexicon(&self) -> &GenericityLexicon {
        &self.lexicon
    }

    /// Apply the rules in order and report the first one that fires.
    pub fn classify(&self, text: Option<&str>) -> Verdict {
        let Some(text) = text else {
            return Verdict::TooShort;
        };

        if text.trim().chars().count() < self.lexicon.min_length {
            return Verdict::TooShort;
        }

        if split_sentences(text).len() < self.lexicon.min_sentences {
            return Verdict::TooFewSentences;
        }

        let lower = text.to_lowercase();

        if let Some(phrase) = self
            .lexicon
            .generic_phrases
            .iter()
            .find(|phrase| lower.contains(phrase.as_str()))
        {
            return Verdict::GenericPhrase(phrase.clone());
        }

        let has_correction = self
            .lexicon
            .corrective_verbs
            .iter()
            .any(|verb| lower.contains(verb.as_str()));
        if !has_correction {
            return Verdict::NoCorrectiveVerb;
        }

        Verdict::Specific
    }

    /// True when the text is useless as coaching feedback.
    pub fn is_generic(&self, text: Option<&str>) -> bool {
        self.classify(text).is_generic()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> FeedbackValidator {
        FeedbackValidator::default()
    }

    #[test]
    fn test_praise_is_generic() {
        assert!(validator().is_generic(Some("Great job, keep practicing!")));
    }

    #[test]
    fn test_specific_correction_passes() {
        let text = "Fix your back elbow by tucking it closer to your body during the load phase to create separation.";
        assert_eq!(validator().classify(Some(text)), Verdict::Specific);
    }

    #[test]
    fn test_missing_and_short() {
        assert_eq!(validator().classify(None), Verdict::TooShort);
        assert_eq!(validator().classify(Some("")), Verdict::TooShort);
        assert_eq!(validator().classify(Some("   Tuck your elbow.   ")), Verdict::TooShort);
    }

    #[test]
    fn test_punctuation_only_has_no_sentences() {
        let text = "...............................!!!";
        assert_eq!(validator().classify(Some(text)), Verdict::TooFewSentences);
    }

    #[test]
    fn test_sentence_threshold_is_configurable() {
        let strict = FeedbackValidator::new(GenericityLexicon {
            min_sentences: 2,
            ..Default::default()
        });
        let one = "Rotate your hips earlier so the barrel stays in the zone.";
        assert_eq!(strict.classify(Some(one)), Verdict::TooFewSentences);

        let two = "Rotate your hips earlier. Keep the barrel in the zone longer.";
        assert_eq!(strict.classify(Some(two)), Verdict::Specific);
    }

    #[test]
    fn test_blacklisted_phrase_wins_over_verbs() {
        let text = "Form looks good overall. Maybe adjust your grip a little bit.";
        assert_eq!(
            validator().classify(Some(text)),
            Verdict::GenericPhrase("form looks good".to_string())
        );
    }

    #[test]
    fn test_fluent_without_correction() {
        let text = "The batter shows athletic posture. The follow through is balanced and smooth.";
        assert_eq!(validator().classify(Some(text)), Verdict::NoCorrectiveVerb);
    }

    #[test]
    fn test_case_insensitive() {
        let text = "ROTATE YOUR HIPS BEFORE YOUR HANDS. TUCK THE BACK ELBOW.";
        assert!(!validator().is_generic(Some(text)));
    }
}
