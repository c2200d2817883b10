mod rules;

pub use rules::{standard_rules, RuleMatcher, RuleWeight, ScoreSignal, ScoringRule};

use serde::{Deserialize, Serialize};

use super::domain::{Candidate, SearchCriteria, Tier};

/// Stateless, additive keyword scorer. Each rule is evaluated independently.
#[derive(Debug, Clone)]
pub struct ScoringEngine {
    rules: Vec<ScoringRule>,
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(standard_rules())
    }
}

impl ScoringEngine {
    pub fn new(rules: Vec<ScoringRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ScoringRule] {
        &self.rules
    }

    pub fn evaluate(&self, candidate: &Candidate, criteria: &SearchCriteria) -> ScoreCard {
        let text = candidate.searchable_text();
        let components: Vec<ScoreComponent> = self
            .rules
            .iter()
            .filter_map(|rule| rule.evaluate(&text, criteria))
            .collect();

        let raw_total: i32 = components.iter().map(|component| component.points).sum();
        let total = raw_total.clamp(0, 100) as u8;

        ScoreCard {
            raw_total,
            total,
            tier: Tier::from_score(total),
            components,
        }
    }

    /// Return `candidate` with its score and tier set from the rule total.
    pub fn apply(&self, candidate: Candidate, criteria: &SearchCriteria) -> Candidate {
        let card = self.evaluate(&candidate, criteria);
        candidate.with_score(card.raw_total)
    }
}

/// Contribution of a single rule, kept for explainability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub signal: ScoreSignal,
    pub points: i32,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    /// Sum before clamping; custom rule sets can push it outside `0..=100`.
    pub raw_total: i32,
    pub total: u8,
    pub tier: Tier,
    pub components: Vec<ScoreComponent>,
}
