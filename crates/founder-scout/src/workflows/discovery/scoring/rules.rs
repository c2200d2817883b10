use serde::{Deserialize, Serialize};

use super::super::domain::SearchCriteria;
use super::super::normalize::TECHNICAL_KEYWORDS;
use super::ScoreComponent;

const FOUNDER_KEYWORDS: &[&str] = &["founder", "co-founder", "exit"];
const DEGREE_KEYWORDS: &[&str] = &["phd", "msc", "master"];
const LEADERSHIP_KEYWORDS: &[&str] = &["head of", "director", "vp", "c-level", "chief", "lead"];

/// Signal a rule looks for, reported back in score breakdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSignal {
    Founder,
    Technical,
    AdvancedDegree,
    Sector,
    Leadership,
}

/// Predicate half of a rule, evaluated against lowercased candidate text.
#[derive(Debug, Clone)]
pub enum RuleMatcher {
    AnyKeyword(&'static [&'static str]),
    SectorMention,
}

/// Points awarded when a rule's matcher fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleWeight {
    Fixed(i32),
    /// Larger award when the caller asked for technical profiles.
    TechnicalEmphasis { emphasized: i32, baseline: i32 },
}

impl RuleWeight {
    fn points(&self, criteria: &SearchCriteria) -> i32 {
        match *self {
            RuleWeight::Fixed(points) => points,
            RuleWeight::TechnicalEmphasis {
                emphasized,
                baseline,
            } => {
                if criteria.technical_signal {
                    emphasized
                } else {
                    baseline
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoringRule {
    pub signal: ScoreSignal,
    pub matcher: RuleMatcher,
    pub weight: RuleWeight,
}

impl ScoringRule {
    pub fn new(signal: ScoreSignal, matcher: RuleMatcher, weight: RuleWeight) -> Self {
        Self {
            signal,
            matcher,
            weight,
        }
    }

    /// `text` must already be lowercased.
    pub(crate) fn evaluate(&self, text: &str, criteria: &SearchCriteria) -> Option<ScoreComponent> {
        let notes = match &self.matcher {
            RuleMatcher::AnyKeyword(keywords) => keywords
                .iter()
                .find(|keyword| text.contains(*keyword))
                .map(|keyword| format!("mentions '{keyword}'"))?,
            RuleMatcher::SectorMention => {
                let sector = criteria.sector_text()?.to_lowercase();
                if !text.contains(&sector) {
                    return None;
                }
                format!("mentions sector '{sector}'")
            }
        };

        Some(ScoreComponent {
            signal: self.signal,
            points: self.weight.points(criteria),
            notes,
        })
    }
}

/// Fixed business rule set, in evaluation order.
pub fn standard_rules() -> Vec<ScoringRule> {
    vec![
        ScoringRule::new(
            ScoreSignal::Founder,
            RuleMatcher::AnyKeyword(FOUNDER_KEYWORDS),
            RuleWeight::Fixed(25),
        ),
        ScoringRule::new(
            ScoreSignal::Technical,
            RuleMatcher::AnyKeyword(TECHNICAL_KEYWORDS),
            RuleWeight::TechnicalEmphasis {
                emphasized: 25,
                baseline: 10,
            },
        ),
        ScoringRule::new(
            ScoreSignal::AdvancedDegree,
            RuleMatcher::AnyKeyword(DEGREE_KEYWORDS),
            RuleWeight::Fixed(10),
        ),
        ScoringRule::new(
            ScoreSignal::Sector,
            RuleMatcher::SectorMention,
            RuleWeight::Fixed(15),
        ),
        ScoringRule::new(
            ScoreSignal::Leadership,
            RuleMatcher::AnyKeyword(LEADERSHIP_KEYWORDS),
            RuleWeight::Fixed(15),
        ),
    ]
}
