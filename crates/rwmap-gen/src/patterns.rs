//! The fixed table of URL shapes under which a manpage can be requested.
//!
//! Each [`AliasPattern`] describes one shape: which optional path segments it
//! carries (suite, binary package, section, language) and therefore which
//! fields its [`ConstraintTemplate`] fixes. Patterns are evaluated in table
//! order, and the first pattern to produce a key wins, so the table order is
//! part of the output contract.

use rwmap_index::{ConstraintTemplate, ManpageVariant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SectionForm {
    /// `3perl`
    Full,
    /// `3`
    Initial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Separator {
    Dot,
    /// FreeBSD-style `/name/section`.
    Slash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AliasPattern {
    suite: bool,
    package: bool,
    section: Option<(SectionForm, Separator)>,
    language: bool,
}

impl AliasPattern {
    const NAME: Self = Self {
        suite: false,
        package: false,
        section: None,
        language: false,
    };

    const fn in_suite(mut self) -> Self {
        self.suite = true;
        self
    }

    const fn in_package(mut self) -> Self {
        self.package = true;
        self
    }

    const fn section(mut self, form: SectionForm) -> Self {
        self.section = Some((form, Separator::Dot));
        self
    }

    const fn slash_section(mut self, form: SectionForm) -> Self {
        self.section = Some((form, Separator::Slash));
        self
    }

    const fn language(mut self) -> Self {
        self.language = true;
        self
    }

    fn render<'v>(
        &self,
        variant: &'v ManpageVariant,
        lowercase_name: &str,
        suite_segment: &str,
    ) -> Alias<'v> {
        let mut key = String::with_capacity(
            lowercase_name.len() + suite_segment.len() + variant.binary_package.len() + 24,
        );
        key.push('/');
        if self.suite {
            key.push_str(suite_segment);
            key.push('/');
        }
        if self.package {
            key.push_str(&variant.binary_package);
            key.push('/');
        }
        key.push_str(lowercase_name);

        let section = self.section.map(|(form, separator)| {
            let section = match form {
                SectionForm::Full => variant.section.as_str(),
                SectionForm::Initial => section_initial(&variant.section),
            };
            key.push(match separator {
                Separator::Dot => '.',
                Separator::Slash => '/',
            });
            key.push_str(section);
            section
        });

        if self.language {
            key.push('.');
            key.push_str(&variant.language);
        }

        Alias {
            key,
            template: ConstraintTemplate {
                language: self.language.then_some(variant.language.as_str()),
                section,
                binary_package: self.package.then_some(variant.binary_package.as_str()),
                // The path may name a suite alias; narrowing always uses the
                // canonical suite.
                suite: self.suite.then_some(variant.suite.as_str()),
            },
        }
    }
}

use AliasPattern as P;
use SectionForm::{Full, Initial};

/// Shapes generated once per variant.
const VARIANT_PATTERNS: &[AliasPattern] = &[
    P::NAME,
    P::NAME.language(),
    P::NAME.section(Full),
    P::NAME.section(Initial),
    P::NAME.slash_section(Full),
    P::NAME.slash_section(Initial),
    P::NAME.section(Full).language(),
    P::NAME.section(Initial).language(),
    P::NAME.in_package(),
    P::NAME.in_package().language(),
    P::NAME.in_package().section(Full),
    P::NAME.in_package().section(Initial),
    P::NAME.in_package().section(Full).language(),
    P::NAME.in_package().section(Initial).language(),
];

/// Shapes generated once per variant and suite name (canonical or alias).
const SUITE_PATTERNS: &[AliasPattern] = &[
    P::NAME.in_suite(),
    P::NAME.in_suite().language(),
    P::NAME.in_suite().section(Full),
    P::NAME.in_suite().section(Initial),
    P::NAME.in_suite().section(Full).language(),
    P::NAME.in_suite().section(Initial).language(),
    P::NAME.in_suite().in_package(),
    P::NAME.in_suite().in_package().language(),
    P::NAME.in_suite().in_package().section(Full),
    P::NAME.in_suite().in_package().section(Initial),
    P::NAME.in_suite().in_package().section(Full).language(),
    P::NAME.in_suite().in_package().section(Initial).language(),
];

/// A URL path together with the constraints it expresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alias<'v> {
    pub key: String,
    pub template: ConstraintTemplate<'v>,
}

/// First character of a section (`3` for `3perl`). Empty sections stay empty.
pub fn section_initial(section: &str) -> &str {
    match section.char_indices().nth(1) {
        Some((end, _)) => &section[..end],
        None => section,
    }
}

/// Every alias for `variant`, in priority order.
///
/// `suites` lists the suite names to emit suite-qualified aliases under,
/// normally the canonical suite followed by its aliases (see
/// [`rwmap_index::SuiteAliases::suites_for`]). Keys may repeat; deduplication
/// is the caller's job.
pub fn enumerate_aliases<'v>(variant: &'v ManpageVariant, suites: &[&str]) -> Vec<Alias<'v>> {
    let lowercase_name = variant.name.to_lowercase();
    let mut aliases =
        Vec::with_capacity(VARIANT_PATTERNS.len() + suites.len() * SUITE_PATTERNS.len());

    aliases.extend(
        VARIANT_PATTERNS
            .iter()
            .map(|pattern| pattern.render(variant, &lowercase_name, "")),
    );
    for suite in suites {
        aliases.extend(
            SUITE_PATTERNS
                .iter()
                .map(|pattern| pattern.render(variant, &lowercase_name, suite)),
        );
    }
    aliases
}
