//! Filesystem glue for the `scribe` binary.
//!
//! The binary itself lives in `src/main.rs`; this library holds the pieces it
//! shares with tests, mainly [`DiskWorkspace`].

mod disk;

pub use disk::{atomic_write, DiskWorkspace};
