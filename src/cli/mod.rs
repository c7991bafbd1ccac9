//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.
//! Each handler implements the logic for a specific CLI subcommand.

mod inspect;

pub use inspect::{open_archive, run_cat, run_find, run_ids, run_ls, run_stat, FindQuery};
