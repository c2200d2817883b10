use std::collections::HashSet;

use super::domain::RawProfile;

/// Drop records whose identity was already seen, keeping first occurrences in order.
///
/// Records without a public identifier, name, or role all share the empty
/// name/role identity and therefore collapse into the first such record.
pub fn dedupe(profiles: Vec<RawProfile>) -> Vec<RawProfile> {
    let mut seen = HashSet::with_capacity(profiles.len());
    profiles
        .into_iter()
        .filter(|profile| seen.insert(profile.identity()))
        .collect()
}
