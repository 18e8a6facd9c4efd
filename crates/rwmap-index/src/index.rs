use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{IndexError, Result};
use crate::model::{ConstraintTemplate, ManpageVariant, SuiteAliases};
use crate::narrow::{narrow, RankingPolicy};
use crate::ManpageIndex;

/// Serialized form of an index, shared by the binary and JSON encodings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexData {
    /// Lowercase manpage name -> every variant of that name.
    #[serde(default)]
    pub entries: BTreeMap<String, Vec<ManpageVariant>>,

    #[serde(default)]
    pub suites: SuiteAliases,

    #[serde(default)]
    pub ranking: RankingPolicy,
}

/// Validated, immutable manpage index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Index {
    data: IndexData,
    variant_count: usize,
}

impl Index {
    pub fn new(data: IndexData) -> Result<Self> {
        for (alias, canonical) in data.suites.iter() {
            for (label, value) in [("alias", alias), ("canonical suite", canonical)] {
                if let Some(reason) = segment_problem(value) {
                    return Err(IndexError::InvalidSuiteAlias {
                        alias: alias.to_string(),
                        reason: format!("{label} {reason}"),
                    });
                }
            }
        }

        let mut variant_count = 0;
        for (key, variants) in &data.entries {
            if variants.is_empty() {
                return Err(invalid_entry(key, "entry has no variants".to_string()));
            }
            for variant in variants {
                validate_variant(key, variant)?;
            }
            variant_count += variants.len();
        }

        Ok(Self {
            data,
            variant_count,
        })
    }

    /// Groups `variants` by lowercase name, keeping their relative order.
    pub fn from_variants(
        variants: impl IntoIterator<Item = ManpageVariant>,
        suites: SuiteAliases,
        ranking: RankingPolicy,
    ) -> Result<Self> {
        let mut entries: BTreeMap<String, Vec<ManpageVariant>> = BTreeMap::new();
        for variant in variants {
            entries
                .entry(variant.name.to_lowercase())
                .or_default()
                .push(variant);
        }
        Self::new(IndexData {
            entries,
            suites,
            ranking,
        })
    }

    pub fn data(&self) -> &IndexData {
        &self.data
    }

    pub fn ranking(&self) -> &RankingPolicy {
        &self.data.ranking
    }

    pub fn name_count(&self) -> usize {
        self.data.entries.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variant_count
    }
}

impl ManpageIndex for Index {
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_> {
        Box::new(self.data.entries.keys().map(String::as_str))
    }

    fn variants(&self, name: &str) -> &[ManpageVariant] {
        self.data
            .entries
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn suite_aliases(&self) -> &SuiteAliases {
        &self.data.suites
    }

    fn narrow<'v>(
        &self,
        accept_language: &str,
        template: &ConstraintTemplate<'_>,
        hint: &ConstraintTemplate<'_>,
        variants: &'v [ManpageVariant],
    ) -> Vec<&'v ManpageVariant> {
        narrow(&self.data.ranking, accept_language, template, hint, variants)
    }
}

fn invalid_entry(key: &str, reason: String) -> IndexError {
    IndexError::InvalidEntry {
        key: key.to_string(),
        reason,
    }
}

fn validate_variant(key: &str, variant: &ManpageVariant) -> Result<()> {
    let fields = [
        ("name", &variant.name),
        ("section", &variant.section),
        ("language", &variant.language),
        ("binary_package", &variant.binary_package),
        ("suite", &variant.suite),
    ];
    for (label, value) in fields {
        if let Some(reason) = segment_problem(value) {
            return Err(invalid_entry(key, format!("{label} {reason}")));
        }
    }

    if variant.name.to_lowercase() != key {
        return Err(invalid_entry(
            key,
            format!("variant name {:?} is filed under the wrong key", variant.name),
        ));
    }
    Ok(())
}

/// Every variant field ends up as (part of) a URL path segment and an output
/// line token.
fn segment_problem(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        return Some("is empty");
    }
    if value.chars().any(|c| c == '/' || c.is_whitespace()) {
        return Some("contains '/' or whitespace");
    }
    None
}
