mod scenarios;

use rwmap_index::{Index, ManpageVariant, RankingPolicy, SuiteAliases};

pub(crate) fn variant(
    name: &str,
    section: &str,
    language: &str,
    pkg: &str,
    suite: &str,
) -> ManpageVariant {
    ManpageVariant {
        name: name.to_string(),
        section: section.to_string(),
        language: language.to_string(),
        binary_package: pkg.to_string(),
        suite: suite.to_string(),
    }
}

/// A few dozen names spread over two suites, several languages and extended
/// sections.
pub(crate) fn archive_index() -> Index {
    let mut variants = Vec::new();
    for i in 0..40 {
        let name = format!("tool{i}");
        variants.push(variant(&name, "1", "en", "tools", "bookworm"));
        if i % 2 == 0 {
            variants.push(variant(&name, "1", "de", "tools", "bookworm"));
        }
        if i % 3 == 0 {
            variants.push(variant(&name, "3perl", "en", "libtools-perl", "sid"));
        }
        if i % 5 == 0 {
            variants.push(variant(&format!("Tool{i}"), "8", "fr", "tools-extra", "sid"));
        }
    }
    let suites: SuiteAliases = [
        ("stable", "bookworm"),
        ("12", "bookworm"),
        ("unstable", "sid"),
    ]
    .into_iter()
    .collect();
    Index::from_variants(
        variants,
        suites,
        RankingPolicy {
            preferred_language: "en".to_string(),
            suite_order: vec!["bookworm".to_string(), "sid".to_string()],
        },
    )
    .unwrap()
}

/// Splits rewrite-map text into `(key, target)` pairs.
pub(crate) fn parse_lines(text: &str) -> Vec<(String, String)> {
    text.lines()
        .map(|line| {
            let (key, target) = line
                .split_once(' ')
                .unwrap_or_else(|| panic!("malformed line {line:?}"));
            (key.to_string(), target.to_string())
        })
        .collect()
}
