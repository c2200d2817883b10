use url::Url;

use super::domain::{Candidate, ProfileType, RawProfile};

pub const PLACEHOLDER_NAME: &str = "LinkedIn Member";
pub const DEFAULT_SUMMARY: &str = "Experienced operator/founder.";
pub const DEFAULT_JUSTIFICATION: &str = "Matches based on profile keywords.";
pub const SUMMARY_MAX_CHARS: usize = 300;

/// Role-text fragments that mark a profile as technical.
pub const TECHNICAL_KEYWORDS: &[&str] =
    &["cto", "engineer", "developer", "ml", "ai", "data", "research"];

const ROLE_KEYS: &[&str] = &["position", "headline", "title", "bio"];
const URL_KEYS: &[&str] = &["linkedinUrl", "linkedin_url", "profileUrl", "profile_url", "url"];
const PROFILE_URL_BASE: &str = "https://www.linkedin.com/in/";

/// Map a provider record onto the canonical candidate shape. Score and tier are left at
/// their unscored defaults.
pub fn normalize_profile(raw: &RawProfile) -> Candidate {
    let name = display_name(raw);
    let role = raw.first_text(ROLE_KEYS);

    let profile_type = match role {
        Some(role) if is_technical(role) => ProfileType::Technical,
        _ => ProfileType::Business,
    };

    let summary = role
        .map(|role| truncate_chars(role, SUMMARY_MAX_CHARS))
        .unwrap_or_else(|| DEFAULT_SUMMARY.to_string());
    let justification = role
        .map(|role| format!("Signals: {role}"))
        .unwrap_or_else(|| DEFAULT_JUSTIFICATION.to_string());

    let links: Vec<String> = profile_link(raw).into_iter().collect();

    Candidate::new(name, profile_type, summary, justification).with_links(links.clone(), links)
}

fn display_name(raw: &RawProfile) -> String {
    raw.person_name()
        .or_else(|| raw.public_identifier().map(str::to_string))
        .unwrap_or_else(|| PLACEHOLDER_NAME.to_string())
}

pub(crate) fn is_technical(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TECHNICAL_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Explicit http(s) profile URL, else one synthesized from a path-safe public identifier.
fn profile_link(raw: &RawProfile) -> Option<String> {
    let explicit = URL_KEYS
        .iter()
        .filter_map(|key| raw.text(key))
        .find(|candidate| is_web_url(candidate));
    if let Some(url) = explicit {
        return Some(url.to_string());
    }

    raw.public_identifier()
        .filter(|identifier| is_path_safe(identifier))
        .map(|identifier| format!("{PROFILE_URL_BASE}{identifier}"))
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

fn is_path_safe(identifier: &str) -> bool {
    identifier
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
}

fn truncate_chars(value: &str, max_chars: usize) -> String {
    value.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflows::discovery::domain::Tier;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawProfile {
        RawProfile::from_value(value).expect("object payload")
    }

    #[test]
    fn normalizes_full_record() {
        let candidate = normalize_profile(&raw(json!({
            "name": "John Doe",
            "position": "CTO & Co-Founder",
            "linkedinUrl": "https://linkedin.com/in/johndoe",
            "publicIdentifier": "johndoe",
            "location": { "linkedinText": "San Francisco, CA" }
        })));

        assert_eq!(candidate.name, "John Doe");
        assert_eq!(candidate.profile_type, ProfileType::Technical);
        assert_eq!(candidate.summary, "CTO & Co-Founder");
        assert_eq!(candidate.contacts, vec!["https://linkedin.com/in/johndoe"]);
        assert_eq!(candidate.source_links, candidate.contacts);
        assert_eq!(candidate.match_justification, "Signals: CTO & Co-Founder");
        assert_eq!(candidate.score(), 0);
        assert_eq!(candidate.tier(), Tier::C);
    }

    #[test]
    fn anonymous_member_uses_identifier_for_name_and_link() {
        let candidate = normalize_profile(&raw(json!({
            "publicIdentifier": "john-doe-123",
            "position": "Founder & CEO"
        })));

        assert_eq!(candidate.name, "john-doe-123");
        assert_eq!(candidate.profile_type, ProfileType::Business);
        assert_eq!(
            candidate.contacts,
            vec!["https://www.linkedin.com/in/john-doe-123"]
        );
    }

    #[test]
    fn unsafe_identifier_produces_no_link() {
        let candidate = normalize_profile(&raw(json!({
            "publicIdentifier": "bad id!",
            "position": "CTO"
        })));

        assert_eq!(candidate.profile_type, ProfileType::Technical);
        assert!(candidate.contacts.is_empty());
        assert!(candidate.source_links.is_empty());

        let candidate = normalize_profile(&raw(json!({
            "publicIdentifier": "invalid@id/../x",
            "position": "Engineer"
        })));
        assert!(candidate.contacts.is_empty());
    }

    #[test]
    fn non_web_urls_are_ignored() {
        let candidate = normalize_profile(&raw(json!({
            "linkedinUrl": "javascript:alert(1)",
            "publicIdentifier": "safe-id"
        })));

        assert_eq!(
            candidate.contacts,
            vec!["https://www.linkedin.com/in/safe-id"]
        );
    }

    #[test]
    fn empty_record_uses_placeholders() {
        let candidate = normalize_profile(&RawProfile::default());

        assert_eq!(candidate.name, PLACEHOLDER_NAME);
        assert_eq!(candidate.profile_type, ProfileType::Business);
        assert_eq!(candidate.summary, DEFAULT_SUMMARY);
        assert_eq!(candidate.match_justification, DEFAULT_JUSTIFICATION);
        assert!(candidate.contacts.is_empty());
        assert!(candidate.source_links.is_empty());
    }

    #[test]
    fn joins_first_and_last_name() {
        let candidate = normalize_profile(&raw(json!({
            "firstName": "Grace",
            "lastName": "Hopper",
            "headline": "Research Engineer"
        })));

        assert_eq!(candidate.name, "Grace Hopper");
        assert_eq!(candidate.profile_type, ProfileType::Technical);
    }

    #[test]
    fn summary_is_truncated_on_char_boundaries() {
        let headline = "é".repeat(SUMMARY_MAX_CHARS + 50);
        let candidate = normalize_profile(&raw(json!({ "headline": headline })));

        assert_eq!(candidate.summary.chars().count(), SUMMARY_MAX_CHARS);
        assert!(candidate.match_justification.ends_with(&headline));
    }
}
