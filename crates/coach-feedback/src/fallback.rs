//! Last-resort feedback used when every attempt is rejected.

const FALLBACK_FEEDBACK: &str = "Tuck your back elbow closer to your body as you load so your hands stay inside the ball. \
Shift your weight from your back leg into a firm front leg as your hips rotate toward the pitcher. \
Keep the bat path short and level through the zone by driving your hands straight to the contact point.";

/// Fixed corrective passage covering elbow tuck, weight transfer and bat path.
pub fn generate() -> &'static str {
    FALLBACK_FEEDBACK
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize;
    use crate::validator::{FeedbackValidator, Verdict};

    #[test]
    fn test_fallback_passes_default_validator() {
        let validator = FeedbackValidator::default();
        assert_eq!(validator.classify(Some(generate())), Verdict::Specific);
    }

    #[test]
    fn test_fallback_is_already_normalized() {
        assert_eq!(normalize(Some(generate())).as_deref(), Some(generate()));
    }
}
