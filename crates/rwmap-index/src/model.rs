use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One concrete manpage: a `(name, section, language, package, suite)` combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManpageVariant {
    /// Case-preserving spelling, e.g. `Xorg` or `ls`.
    pub name: String,
    pub section: String,
    pub language: String,
    pub binary_package: String,
    /// Canonical suite identifier (a codename such as `bookworm`).
    pub suite: String,
}

impl ManpageVariant {
    /// Path under which the rendered page is served, with `suffix` appended
    /// (e.g. `.html`).
    pub fn serving_path(&self, suffix: &str) -> String {
        format!(
            "/{}/{}/{}.{}.{}{}",
            self.suite, self.binary_package, self.name, self.section, self.language, suffix
        )
    }
}

/// Partial variant used to narrow a variant list. `None` fields are wildcards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ConstraintTemplate<'a> {
    pub language: Option<&'a str>,
    pub section: Option<&'a str>,
    pub binary_package: Option<&'a str>,
    pub suite: Option<&'a str>,
}

impl ConstraintTemplate<'_> {
    pub fn is_empty(&self) -> bool {
        self.language.is_none()
            && self.section.is_none()
            && self.binary_package.is_none()
            && self.suite.is_none()
    }

    /// Whether `variant` satisfies every field this template sets.
    ///
    /// Sections match by prefix so that a one-character section (`3`) selects
    /// extended sections (`3perl`, `3ssl`) as well.
    pub fn matches(&self, variant: &ManpageVariant) -> bool {
        self.suite.map_or(true, |suite| variant.suite == suite)
            && self
                .binary_package
                .map_or(true, |pkg| variant.binary_package == pkg)
            && self
                .language
                .map_or(true, |language| variant.language == language)
            && self
                .section
                .map_or(true, |section| variant.section.starts_with(section))
    }

    /// Number of set fields `variant` does not equal exactly.
    pub(crate) fn mismatches(&self, variant: &ManpageVariant) -> u8 {
        let fields = [
            (self.suite, variant.suite.as_str()),
            (self.binary_package, variant.binary_package.as_str()),
            (self.language, variant.language.as_str()),
            (self.section, variant.section.as_str()),
        ];
        fields
            .iter()
            .filter(|(want, have)| want.is_some_and(|want| want != *have))
            .count() as u8
    }
}

impl fmt::Display for ConstraintTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields = [
            ("language", self.language),
            ("section", self.section),
            ("binary_package", self.binary_package),
            ("suite", self.suite),
        ];
        f.write_str("{")?;
        let mut first = true;
        for (label, value) in fields {
            let Some(value) = value else {
                continue;
            };
            if !first {
                f.write_str(", ")?;
            }
            write!(f, "{label}={value}")?;
            first = false;
        }
        f.write_str("}")
    }
}

/// Alias suite name -> canonical suite identifier (e.g. `stable` -> `bookworm`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SuiteAliases(BTreeMap<String, String>);

impl SuiteAliases {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: impl Into<String>, canonical: impl Into<String>) {
        self.0.insert(alias.into(), canonical.into());
    }

    pub fn canonical(&self, alias: &str) -> Option<&str> {
        self.0.get(alias).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(alias, canonical)| (alias.as_str(), canonical.as_str()))
    }

    /// Every suite name that resolves to `canonical`: the canonical name first,
    /// then its aliases in byte order. Self-mappings are not repeated.
    pub fn suites_for<'a>(&'a self, canonical: &'a str) -> Vec<&'a str> {
        let mut suites = vec![canonical];
        suites.extend(
            self.iter()
                .filter(|(alias, target)| *target == canonical && *alias != canonical)
                .map(|(alias, _)| alias),
        );
        suites
    }
}

impl<A: Into<String>, C: Into<String>> FromIterator<(A, C)> for SuiteAliases {
    fn from_iter<T: IntoIterator<Item = (A, C)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(alias, canonical)| (alias.into(), canonical.into()))
                .collect(),
        )
    }
}
