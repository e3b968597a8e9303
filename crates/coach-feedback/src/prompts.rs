//! Escalating prompt tiers.
//!
//! Each tier is more directive than the previous one. Attempts past the last
//! tier keep using the strictest prompt.

use coach_models::AttemptPrompt;

use crate::error::{FeedbackError, FeedbackResult};

const TIER_1_SYSTEM: &str = "You are an expert baseball hitting coach reviewing frames from a single swing. \
Give short, specific, corrective coaching.";

const TIER_1_USER: &str = "Look at these frames of my swing and give me 2-3 sentences of specific corrective feedback. \
Name the body part, what is wrong with it, and how to fix it.";

const TIER_2_SYSTEM: &str = "You are a strict hitting coach. Never give praise. \
You MUST identify concrete mechanical flaws in the swing.";

const TIER_2_USER: &str = "You MUST respond with exactly 2-3 sentences. Each sentence MUST name one body part or mechanic \
(back elbow, front shoulder, hips, hands, stance width, stride, head position, weight transfer, bat path) \
and a correction that uses a verb such as fix, adjust, tuck, rotate, shift, lower, raise or straighten. \
Do NOT say the swing looks good.";

const TIER_3_SYSTEM: &str = "You are a hitting coach that only outputs corrections in the required format. \
Any praise or general encouragement is an invalid answer.";

const TIER_3_USER: &str = "REQUIRED FORMAT. Write exactly three sentences using this template and nothing else:\n\
1. Fix your [body part] by [specific action].\n\
2. Adjust your [mechanic] by [specific action].\n\
3. Rotate, shift or drive your [body part] [specific direction or timing].";

/// Ordered, immutable list of prompt tiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptEscalator {
    tiers: Vec<AttemptPrompt>,
}

impl PromptEscalator {
    /// Build from custom tiers, least directive first.
    pub fn new(tiers: Vec<AttemptPrompt>) -> FeedbackResult<Self> {
        if tiers.is_empty() {
            return Err(FeedbackError::config("at least one prompt tier is required"));
        }
        Ok(Self { tiers })
    }

    /// Prompt for a 1-based attempt number, saturating at the last tier.
    pub fn prompt_for(&self, attempt: u32) -> &AttemptPrompt {
        let index = (attempt.max(1) as usize - 1).min(self.tiers.len() - 1);
        &self.tiers[index]
    }

    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }
}

impl Default for PromptEscalator {
    fn default() -> Self {
        Self {
            tiers: vec![
                AttemptPrompt::new(TIER_1_SYSTEM, TIER_1_USER),
                AttemptPrompt::new(TIER_2_SYSTEM, TIER_2_USER),
                AttemptPrompt::new(TIER_3_SYSTEM, TIER_3_USER),
            ],
        }
    }
}
