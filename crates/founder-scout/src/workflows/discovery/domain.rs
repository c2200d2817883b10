use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Hiring criteria supplied by the caller for a single discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    #[serde(default = "default_min_years")]
    pub min_years_experience: u32,
    #[serde(default)]
    pub sector: Option<String>,
    #[serde(default)]
    pub academic: Option<String>,
    #[serde(default = "enabled")]
    pub founder_signal: bool,
    #[serde(default = "enabled")]
    pub technical_signal: bool,
    #[serde(default = "enabled")]
    pub startup_experience_required: bool,
}

fn default_min_years() -> u32 {
    5
}

fn enabled() -> bool {
    true
}

impl Default for SearchCriteria {
    fn default() -> Self {
        Self {
            min_years_experience: default_min_years(),
            sector: None,
            academic: None,
            founder_signal: true,
            technical_signal: true,
            startup_experience_required: true,
        }
    }
}

impl SearchCriteria {
    /// Sector text as used for matching and geo lookup; `None` when blank.
    pub fn sector_text(&self) -> Option<&str> {
        self.sector
            .as_deref()
            .map(str::trim)
            .filter(|sector| !sector.is_empty())
    }
}

/// Coarse classification of a candidate's background.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ProfileType {
    Technical,
    #[default]
    Business,
}

impl ProfileType {
    pub fn label(&self) -> &'static str {
        match self {
            ProfileType::Technical => "technical",
            ProfileType::Business => "business",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "technical" => Some(ProfileType::Technical),
            "business" => Some(ProfileType::Business),
            _ => None,
        }
    }
}

/// Match-quality bucket; ordering puts `A` first.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Tier {
    A,
    B,
    #[default]
    C,
}

impl Tier {
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Tier::A
        } else if score >= 60 {
            Tier::B
        } else {
            Tier::C
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::A => "A",
            Tier::B => "B",
            Tier::C => "C",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Tier::A),
            "B" => Some(Tier::B),
            "C" => Some(Tier::C),
            _ => None,
        }
    }
}

/// Canonical candidate record produced by normalization and consumed by the sink.
///
/// `score` is always within `0..=100` and `tier` is derived from it, so both are
/// only settable through [`Candidate::with_score`]. Deserialization goes through the
/// same path; an incoming `tier` is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "CandidateRecord")]
pub struct Candidate {
    pub name: String,
    pub profile_type: ProfileType,
    pub summary: String,
    pub contacts: Vec<String>,
    pub source_links: Vec<String>,
    pub match_justification: String,
    tier: Tier,
    score: u8,
}

impl Candidate {
    pub fn new(
        name: impl Into<String>,
        profile_type: ProfileType,
        summary: impl Into<String>,
        match_justification: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            profile_type,
            summary: summary.into(),
            contacts: Vec::new(),
            source_links: Vec::new(),
            match_justification: match_justification.into(),
            tier: Tier::C,
            score: 0,
        }
    }

    pub fn with_links(mut self, contacts: Vec<String>, source_links: Vec<String>) -> Self {
        self.contacts = contacts;
        self.source_links = source_links;
        self
    }

    /// Clamp a raw rule total into `0..=100` and derive the tier from it.
    pub fn with_score(mut self, raw_score: i32) -> Self {
        let score = raw_score.clamp(0, 100) as u8;
        self.score = score;
        self.tier = Tier::from_score(score);
        self
    }

    pub fn score(&self) -> u8 {
        self.score
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Lowercased text the scoring rules and catalog search operate on.
    pub fn searchable_text(&self) -> String {
        format!("{} {}", self.summary, self.match_justification).to_lowercase()
    }
}

#[derive(Deserialize)]
struct CandidateRecord {
    name: String,
    #[serde(default)]
    profile_type: ProfileType,
    #[serde(default)]
    summary: String,
    #[serde(default)]
    contacts: Vec<String>,
    #[serde(default)]
    source_links: Vec<String>,
    #[serde(default)]
    match_justification: String,
    #[serde(default)]
    score: i64,
}

impl From<CandidateRecord> for Candidate {
    fn from(record: CandidateRecord) -> Self {
        let score = record.score.clamp(0, 100) as i32;
        Candidate::new(
            record.name,
            record.profile_type,
            record.summary,
            record.match_justification,
        )
        .with_links(record.contacts, record.source_links)
        .with_score(score)
    }
}

/// Provider-native profile record. Field names vary between provider revisions,
/// so it is kept as an opaque JSON object and interpreted through accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawProfile(Map<String, Value>);

impl RawProfile {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Wrap a JSON value; anything other than an object is rejected.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Trimmed string value for `key`, ignoring blanks and non-string values.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty())
    }

    pub fn first_text(&self, keys: &[&str]) -> Option<&str> {
        keys.iter().find_map(|key| self.text(key))
    }

    /// Location is either a plain string or an object carrying display text.
    pub fn location_text(&self) -> Option<&str> {
        match self.0.get("location")? {
            Value::String(text) => Some(text.trim()).filter(|text| !text.is_empty()),
            Value::Object(location) => ["linkedinText", "text", "name"]
                .iter()
                .find_map(|key| location.get(*key).and_then(Value::as_str))
                .map(str::trim)
                .filter(|text| !text.is_empty()),
            _ => None,
        }
    }

    /// Name from `name`/`fullName`/`full_name`, else `firstName` and `lastName` joined.
    pub fn person_name(&self) -> Option<String> {
        if let Some(name) = self.first_text(&["name", "fullName", "full_name"]) {
            return Some(name.to_string());
        }
        match (self.text("firstName"), self.text("lastName")) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(part), None) | (None, Some(part)) => Some(part.to_string()),
            (None, None) => None,
        }
    }

    pub fn public_identifier(&self) -> Option<&str> {
        self.text("publicIdentifier")
    }

    pub fn identity(&self) -> CandidateIdentity {
        if let Some(public_id) = self.public_identifier() {
            return CandidateIdentity::PublicId(public_id.to_lowercase());
        }

        let name = self.person_name().unwrap_or_default().to_lowercase();
        let role = self
            .first_text(&["position", "headline"])
            .unwrap_or_default()
            .to_lowercase();
        CandidateIdentity::NameRole { name, role }
    }
}

impl From<Map<String, Value>> for RawProfile {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Deduplication key. Records sharing a key are treated as the same person.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CandidateIdentity {
    PublicId(String),
    NameRole { name: String, role: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(value: Value) -> RawProfile {
        RawProfile::from_value(value).expect("object payload")
    }

    #[test]
    fn tier_boundaries_follow_score() {
        assert_eq!(Tier::from_score(100), Tier::A);
        assert_eq!(Tier::from_score(80), Tier::A);
        assert_eq!(Tier::from_score(79), Tier::B);
        assert_eq!(Tier::from_score(60), Tier::B);
        assert_eq!(Tier::from_score(59), Tier::C);
        assert_eq!(Tier::from_score(0), Tier::C);
    }

    #[test]
    fn with_score_clamps_into_range() {
        let candidate = Candidate::new("Ada", ProfileType::Technical, "CTO", "Signals: CTO");
        assert_eq!(candidate.score(), 0);
        assert_eq!(candidate.tier(), Tier::C);

        let high = candidate.clone().with_score(140);
        assert_eq!(high.score(), 100);
        assert_eq!(high.tier(), Tier::A);

        let low = candidate.with_score(-20);
        assert_eq!(low.score(), 0);
        assert_eq!(low.tier(), Tier::C);
    }

    #[test]
    fn criteria_defaults_match_intake_form() {
        let criteria: SearchCriteria = serde_json::from_value(json!({})).expect("defaults apply");
        assert_eq!(criteria, SearchCriteria::default());
        assert_eq!(criteria.min_years_experience, 5);
        assert!(criteria.founder_signal && criteria.technical_signal);
        assert!(criteria.sector_text().is_none());

        let criteria = SearchCriteria {
            sector: Some("  Fintech ".to_string()),
            ..SearchCriteria::default()
        };
        assert_eq!(criteria.sector_text(), Some("Fintech"));
    }

    #[test]
    fn identity_prefers_public_identifier() {
        let profile = raw(json!({
            "publicIdentifier": " John-Doe-123 ",
            "name": "John Doe",
            "position": "CTO"
        }));
        assert_eq!(
            profile.identity(),
            CandidateIdentity::PublicId("john-doe-123".to_string())
        );
    }

    #[test]
    fn identity_falls_back_to_name_and_role() {
        let profile = raw(json!({ "name": " Jane Smith ", "position": "Founder & CEO" }));
        assert_eq!(
            profile.identity(),
            CandidateIdentity::NameRole {
                name: "jane smith".to_string(),
                role: "founder & ceo".to_string(),
            }
        );

        assert_eq!(
            RawProfile::default().identity(),
            CandidateIdentity::NameRole {
                name: String::new(),
                role: String::new(),
            }
        );
    }

    #[test]
    fn identity_name_uses_alternate_name_fields() {
        let full = raw(json!({ "fullName": "Alice Smith", "position": "CTO" }));
        let split = raw(json!({ "firstName": "Alice", "lastName": "Smith", "headline": "CTO" }));
        let expected = CandidateIdentity::NameRole {
            name: "alice smith".to_string(),
            role: "cto".to_string(),
        };
        assert_eq!(full.identity(), expected);
        assert_eq!(split.identity(), expected);
        assert!(RawProfile::default().person_name().is_none());
    }

    #[test]
    fn deserialized_candidate_rederives_tier_from_score() {
        let candidate: Candidate = serde_json::from_value(json!({
            "name": "Ada",
            "profile_type": "technical",
            "summary": "CTO",
            "contacts": [],
            "source_links": [],
            "match_justification": "Signals: CTO",
            "tier": "A",
            "score": 5
        }))
        .expect("candidate decodes");
        assert_eq!(candidate.score(), 5);
        assert_eq!(candidate.tier(), Tier::C);

        let candidate: Candidate =
            serde_json::from_value(json!({ "name": "Bo", "tier": "C", "score": 140 }))
                .expect("candidate decodes");
        assert_eq!(candidate.score(), 100);
        assert_eq!(candidate.tier(), Tier::A);
    }

    #[test]
    fn location_text_reads_nested_objects() {
        let nested = raw(json!({ "location": { "linkedinText": "Lisbon, Portugal" } }));
        assert_eq!(nested.location_text(), Some("Lisbon, Portugal"));

        let flat = raw(json!({ "location": "Porto" }));
        assert_eq!(flat.location_text(), Some("Porto"));

        let odd = raw(json!({ "location": 42 }));
        assert!(odd.location_text().is_none());
    }

    #[test]
    fn non_object_payloads_are_rejected() {
        assert!(RawProfile::from_value(json!(["not", "a", "profile"])).is_none());
        assert!(RawProfile::from_value(json!("text")).is_none());
    }
}
