use std::collections::BTreeSet;

use serde::Serialize;

use super::domain::SearchCriteria;

const FOUNDER_TITLES: &[&str] = &["Co-Founder", "Founder"];
const TECHNICAL_TITLES: &[&str] = &["CTO", "Chief Technology Officer"];

/// Broad free-text queries tried after the cascade when the pool is still short.
pub const ROTATION_QUERIES: &[&str] = &[
    "startup founder",
    "technical co-founder",
    "cto startup",
    "serial entrepreneur",
    "founder exit",
    "venture backed founder",
];

/// Provider query parameters for one adapter call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileQuery {
    pub search: String,
    pub title: String,
    pub location: String,
    pub geo_id: String,
    pub page: u32,
    pub limit: usize,
}

/// A named step of the fallback cascade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryAttempt {
    pub label: String,
    pub query: ProfileQuery,
}

/// Comma-separated title filter built from the requested signals.
pub fn title_filter(criteria: &SearchCriteria) -> String {
    let mut titles = BTreeSet::new();
    if criteria.founder_signal {
        titles.extend(FOUNDER_TITLES.iter().copied());
    }
    if criteria.technical_signal {
        titles.extend(TECHNICAL_TITLES.iter().copied());
    }
    titles.into_iter().collect::<Vec<_>>().join(", ")
}

/// Primary free-text keyword for the keyword-driven steps.
pub fn keyword_term(criteria: &SearchCriteria) -> &'static str {
    if criteria.founder_signal {
        "founder"
    } else if criteria.technical_signal {
        "cto"
    } else {
        "startup"
    }
}

/// Fixed cascade, most targeted first. The order is significant.
pub fn standard_cascade(
    criteria: &SearchCriteria,
    geo_id: &str,
    page_limit: usize,
) -> Vec<QueryAttempt> {
    let title = title_filter(criteria);
    let term = keyword_term(criteria);
    let location = criteria.sector_text().unwrap_or_default().to_string();

    let attempt = |label: &str, search: String, title: &str, location: &str, geo_id: &str| {
        QueryAttempt {
            label: label.to_string(),
            query: ProfileQuery {
                search,
                title: title.to_string(),
                location: location.to_string(),
                geo_id: geo_id.to_string(),
                page: 1,
                limit: page_limit,
            },
        }
    };

    vec![
        attempt("geo_title", String::new(), &title, "", geo_id),
        attempt("location_title", String::new(), &title, &location, ""),
        attempt("geo_keywords", term.to_string(), "", "", geo_id),
        attempt("title_only", String::new(), &title, "", ""),
        attempt("broad_keywords", format!("{term} startup"), "", "", ""),
    ]
}

/// Rotation steps, labelled by their query text.
pub fn rotation_attempts(page_limit: usize) -> Vec<QueryAttempt> {
    ROTATION_QUERIES
        .iter()
        .map(|query| QueryAttempt {
            label: format!("rotation:{query}"),
            query: ProfileQuery {
                search: (*query).to_string(),
                page: 1,
                limit: page_limit,
                ..ProfileQuery::default()
            },
        })
        .collect()
}
