use serde::{Deserialize, Serialize};

use crate::model::{ConstraintTemplate, ManpageVariant};

/// Tie-break preferences used when several variants satisfy a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingPolicy {
    /// Language served when a request does not name one.
    #[serde(default = "RankingPolicy::default_language")]
    pub preferred_language: String,

    /// Canonical suites in order of preference. Unlisted suites rank after
    /// listed ones.
    #[serde(default)]
    pub suite_order: Vec<String>,
}

impl RankingPolicy {
    fn default_language() -> String {
        "en".to_owned()
    }
}

impl Default for RankingPolicy {
    fn default() -> Self {
        Self {
            preferred_language: Self::default_language(),
            suite_order: Vec::new(),
        }
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct RankKey<'v> {
    section_fallback: bool,
    hint_mismatches: u8,
    language_rank: usize,
    language: &'v str,
    suite_rank: usize,
    suite: &'v str,
    section: &'v str,
    binary_package: &'v str,
    name: &'v str,
}

/// Returns the variants matching `template`, best match first.
///
/// Ordering, most significant first:
/// - exact section matches before prefix-only section matches
/// - variants agreeing with more of `hint`
/// - languages from `accept_language` (in listed order), then the preferred language
/// - suites in `suite_order`
/// - section, binary package and name in byte order
pub fn narrow<'v>(
    policy: &RankingPolicy,
    accept_language: &str,
    template: &ConstraintTemplate<'_>,
    hint: &ConstraintTemplate<'_>,
    variants: &'v [ManpageVariant],
) -> Vec<&'v ManpageVariant> {
    let accepted = accepted_languages(accept_language);
    let mut matches: Vec<&'v ManpageVariant> =
        variants.iter().filter(|v| template.matches(v)).collect();
    if matches.len() < 2 {
        return matches;
    }

    matches.sort_by_cached_key(|v| {
        let v: &'v ManpageVariant = *v;
        RankKey {
            section_fallback: template.section.is_some_and(|section| v.section != section),
            hint_mismatches: hint.mismatches(v),
            language_rank: language_rank(policy, &accepted, &v.language),
            language: &v.language,
            suite_rank: policy
                .suite_order
                .iter()
                .position(|suite| *suite == v.suite)
                .unwrap_or(usize::MAX),
            suite: &v.suite,
            section: &v.section,
            binary_package: &v.binary_package,
            name: &v.name,
        }
    });
    matches
}

fn language_rank(policy: &RankingPolicy, accepted: &[&str], language: &str) -> usize {
    if let Some(pos) = accepted.iter().position(|tag| *tag == language) {
        return pos;
    }
    if language == policy.preferred_language {
        return accepted.len();
    }
    usize::MAX
}

/// Parses an `Accept-Language` style list (`de, en;q=0.8`) into tags in
/// listed order. Quality values and `*` are ignored.
fn accepted_languages(header: &str) -> Vec<&str> {
    header
        .split(',')
        .filter_map(|part| part.split(';').next())
        .map(str::trim)
        .filter(|tag| !tag.is_empty() && *tag != "*")
        .collect()
}
