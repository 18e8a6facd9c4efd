//! Manpage lookup index consumed by the rewrite-map generator.
//!
//! The index maps every lowercase manpage name to its variants (one per
//! section/language/package/suite combination) and carries the suite alias
//! table (`stable` -> `bookworm`, ...). Its main query is *narrowing*: given a
//! partial [`ConstraintTemplate`], return the matching variants best-first.
//!
//! ## On-disk formats
//! - binary: `RWMAPIDX` magic + format version + `bincode` payload, written by
//!   [`save_index`]
//! - JSON: a plain [`IndexData`] document, convenient for hand-written fixtures
//!
//! [`load_index`] detects the format from the leading bytes.

mod error;
mod index;
mod model;
mod narrow;
mod persistence;

pub use error::{IndexError, Result};
pub use index::{Index, IndexData};
pub use model::{ConstraintTemplate, ManpageVariant, SuiteAliases};
pub use narrow::{narrow, RankingPolicy};
pub use persistence::{
    load_index, save_index, INDEX_FORMAT_VERSION, INDEX_MAGIC, INDEX_PAYLOAD_LIMIT_BYTES,
};

/// Read-only view of a manpage index, shared by all shard workers.
pub trait ManpageIndex: Sync {
    /// Every name key (lowercase manpage name).
    fn names(&self) -> Box<dyn Iterator<Item = &str> + '_>;

    /// Variants filed under `name`; empty if the name is unknown.
    fn variants(&self, name: &str) -> &[ManpageVariant];

    fn suite_aliases(&self) -> &SuiteAliases;

    /// Variants from `variants` matching `template`, best match first.
    ///
    /// `hint` expresses soft preferences (e.g. the suite of the page a visitor
    /// came from); an empty hint has no effect.
    fn narrow<'v>(
        &self,
        accept_language: &str,
        template: &ConstraintTemplate<'_>,
        hint: &ConstraintTemplate<'_>,
        variants: &'v [ManpageVariant],
    ) -> Vec<&'v ManpageVariant>;
}
