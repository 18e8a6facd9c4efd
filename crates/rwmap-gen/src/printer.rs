use std::collections::HashSet;
use std::io::Write;

use rwmap_index::{ManpageIndex, ManpageVariant};

use crate::error::RwmapError;
use crate::patterns::{enumerate_aliases, Alias};
use crate::resolve::resolve_alias;

/// Writes each alias key of one manpage name at most once.
///
/// A printer lives for exactly one name; keys are never deduplicated across
/// names or shards.
pub struct OncePrinter<'a, I: ?Sized, W> {
    index: &'a I,
    name: &'a str,
    variants: &'a [ManpageVariant],
    extension: &'a str,
    out: &'a mut W,
    printed: HashSet<String>,
}

impl<'a, I, W> OncePrinter<'a, I, W>
where
    I: ManpageIndex + ?Sized,
    W: Write,
{
    pub fn new(index: &'a I, name: &'a str, extension: &'a str, out: &'a mut W) -> Self {
        Self {
            index,
            name,
            variants: index.variants(name),
            extension,
            out,
            printed: HashSet::new(),
        }
    }

    /// Resolves and writes `alias` unless its key was already written.
    /// Returns whether a line was written.
    pub fn must_print(&mut self, alias: Alias<'_>) -> Result<bool, RwmapError> {
        if self.printed.contains(&alias.key) {
            return Ok(false);
        }
        let target = resolve_alias(self.index, self.name, self.variants, &alias, self.extension)?;

        self.out.write_all(alias.key.as_bytes())?;
        self.out.write_all(b" ")?;
        self.out.write_all(target.as_bytes())?;
        self.out.write_all(b"\n")?;

        self.printed.insert(alias.key);
        Ok(true)
    }

    pub fn lines(&self) -> usize {
        self.printed.len()
    }
}

/// Writes every alias line for `name` to `out`; returns the number of lines.
pub fn print_name<I, W>(index: &I, name: &str, extension: &str, out: &mut W) -> Result<usize, RwmapError>
where
    I: ManpageIndex + ?Sized,
    W: Write,
{
    let mut printer = OncePrinter::new(index, name, extension, out);
    for variant in index.variants(name) {
        let suites = index.suite_aliases().suites_for(&variant.suite);
        for alias in enumerate_aliases(variant, &suites) {
            printer.must_print(alias)?;
        }
    }
    Ok(printer.lines())
}
