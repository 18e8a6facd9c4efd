//! Library wrapper around the `idx2rwmap` CLI implementation.
//!
//! Compiling the binary crate root as a module keeps `cargo test -p rwmap-cli --lib`
//! a fast typecheck of the CLI code.
//!
//! Note: `fn main()` inside `main.rs` is just another function when compiled as a module.

#[allow(dead_code)]
#[path = "main.rs"]
mod main_bin;
