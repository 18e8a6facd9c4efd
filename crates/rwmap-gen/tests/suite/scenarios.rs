use std::collections::BTreeMap;

use rwmap_gen::print_name;
use rwmap_index::{Index, RankingPolicy, SuiteAliases};

use super::{parse_lines, variant};

fn render(index: &Index, name: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    print_name(index, name, ".html", &mut out).unwrap();
    parse_lines(&String::from_utf8(out).unwrap())
}

#[test]
fn single_variant_with_suite_alias() {
    let suites: SuiteAliases = [("stable", "bullseye")].into_iter().collect();
    let index = Index::from_variants(
        [variant("Ls", "1", "en", "coreutils", "bullseye")],
        suites,
        RankingPolicy::default(),
    )
    .unwrap();

    let lines = render(&index, "ls");
    let keys: Vec<&str> = lines.iter().map(|(key, _)| key.as_str()).collect();
    assert_eq!(
        keys,
        vec![
            "/ls",
            "/ls.en",
            "/ls.1",
            "/ls/1",
            "/ls.1.en",
            "/coreutils/ls",
            "/coreutils/ls.en",
            "/coreutils/ls.1",
            "/coreutils/ls.1.en",
            "/bullseye/ls",
            "/bullseye/ls.en",
            "/bullseye/ls.1",
            "/bullseye/ls.1.en",
            "/bullseye/coreutils/ls",
            "/bullseye/coreutils/ls.en",
            "/bullseye/coreutils/ls.1",
            "/bullseye/coreutils/ls.1.en",
            "/stable/ls",
            "/stable/ls.en",
            "/stable/ls.1",
            "/stable/ls.1.en",
            "/stable/coreutils/ls",
            "/stable/coreutils/ls.en",
            "/stable/coreutils/ls.1",
            "/stable/coreutils/ls.1.en",
        ]
    );
    for (key, target) in &lines {
        assert_eq!(target, "/bullseye/coreutils/Ls.1.en.html", "target of {key}");
    }
}

#[test]
fn unqualified_alias_follows_index_ranking_across_languages() {
    // German is listed first; the index prefers English for unqualified requests.
    let index = Index::from_variants(
        [
            variant("grep", "1", "de", "grep", "sid"),
            variant("grep", "1", "en", "grep", "sid"),
        ],
        SuiteAliases::new(),
        RankingPolicy::default(),
    )
    .unwrap();

    let targets: BTreeMap<String, String> = render(&index, "grep").into_iter().collect();
    assert_eq!(targets["/grep"], "/sid/grep/grep.1.en.html");
    assert_eq!(targets["/grep.1"], "/sid/grep/grep.1.en.html");
    assert_eq!(targets["/grep.de"], "/sid/grep/grep.1.de.html");
    assert_eq!(targets["/grep.en"], "/sid/grep/grep.1.en.html");
    assert_eq!(targets["/grep.1.de"], "/sid/grep/grep.1.de.html");
    assert_eq!(targets["/sid/grep/grep.de"], "/sid/grep/grep.1.de.html");
}

#[test]
fn section_initial_alias_prefers_exact_section() {
    // The extended section is processed first, yet `/printf.3` must resolve to
    // the page that really lives in section 3.
    let index = Index::from_variants(
        [
            variant("printf", "3perl", "en", "perl-doc", "sid"),
            variant("printf", "3", "en", "manpages-dev", "sid"),
            variant("printf", "1", "en", "coreutils", "sid"),
        ],
        SuiteAliases::new(),
        RankingPolicy::default(),
    )
    .unwrap();

    let targets: BTreeMap<String, String> = render(&index, "printf").into_iter().collect();
    assert_eq!(targets["/printf.3"], "/sid/manpages-dev/printf.3.en.html");
    assert_eq!(targets["/printf/3"], "/sid/manpages-dev/printf.3.en.html");
    assert_eq!(targets["/printf.3perl"], "/sid/perl-doc/printf.3perl.en.html");
    assert_eq!(targets["/perl-doc/printf.3"], "/sid/perl-doc/printf.3perl.en.html");
    assert_eq!(targets["/printf.1"], "/sid/coreutils/printf.1.en.html");
}

#[test]
fn suite_aliases_resolve_within_their_canonical_suite() {
    let suites: SuiteAliases = [("stable", "bookworm"), ("unstable", "sid")]
        .into_iter()
        .collect();
    let index = Index::from_variants(
        [
            variant("bash", "1", "en", "bash", "sid"),
            variant("bash", "1", "en", "bash", "bookworm"),
        ],
        suites,
        RankingPolicy {
            preferred_language: "en".to_string(),
            suite_order: vec!["bookworm".to_string()],
        },
    )
    .unwrap();

    let targets: BTreeMap<String, String> = render(&index, "bash").into_iter().collect();
    assert_eq!(targets["/bash"], "/bookworm/bash/bash.1.en.html");
    assert_eq!(targets["/stable/bash"], "/bookworm/bash/bash.1.en.html");
    assert_eq!(targets["/unstable/bash"], "/sid/bash/bash.1.en.html");
    assert_eq!(targets["/sid/bash/bash.1.en"], "/sid/bash/bash.1.en.html");
    assert!(!targets.contains_key("/stable/stable/bash"));
}

#[test]
fn serving_extension_is_configurable() {
    let index = Index::from_variants(
        [variant("ls", "1", "en", "coreutils", "sid")],
        SuiteAliases::new(),
        RankingPolicy::default(),
    )
    .unwrap();

    let mut out = Vec::new();
    print_name(&index, "ls", "", &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("/ls /sid/coreutils/ls.1.en\n"), "{text}");
}
