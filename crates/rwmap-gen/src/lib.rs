//! Generates an Apache-style rewrite map from a manpage index.
//!
//! For every manpage name the generator enumerates all URL paths a visitor
//! might use (`/ls`, `/ls.1`, `/stable/coreutils/ls.1.en`, ...), resolves each
//! one to a single serving path by narrowing the name's variants, and writes
//! `<alias> <serving path>` lines. Work is spread over a fixed pool of workers,
//! each writing its own `output.<n>` shard.
//!
//! Shards are neither sorted nor deduplicated against each other. Combine them
//! with a byte-order sort and convert the result for the web server:
//!
//! ```text
//! LC_ALL=C sort output.* > /srv/man/rwmap.txt
//! httxt2dbm -i /srv/man/rwmap.txt -o /srv/man/rwmap.dbm
//! ```

mod error;
mod patterns;
mod printer;
mod resolve;
mod shard;

pub use error::RwmapError;
pub use patterns::{enumerate_aliases, section_initial, Alias};
pub use printer::{print_name, OncePrinter};
pub use resolve::{resolve_alias, DEFAULT_SERVING_EXTENSION};
pub use shard::{shard_path, write_shards, RunReport, ShardOptions, ShardReport};
