//! # boilerplate
//!
//! A tool that keeps the project license header and editor modelines on every source file of a tree, and checks
//! that C++ implementation files include their own header first.
//!
//! `boilerplate` rewrites source files in place and never adds a license or modeline that a file already contains,
//! so running it twice changes nothing the second time.
//!
//! ## Features
//!
//! * Recursively scan a tree and add the license header (top) and modelines (bottom) where missing
//! * Per-extension comment prefixes: one `//` template is adapted to `;`, `#` or `--` files
//! * Directory exclusions and license exemptions by path prefix
//! * Dry-run mode with diffs, plus JSON and CSV reports
//! * Include-convention check: `foo.cpp` that includes `foo.h` must include it first
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//!
//! use boilerplate::processor::{Processor, ProcessorConfig};
//! use boilerplate::report::RunSummary;
//! use boilerplate::templates::Template;
//!
//! fn main() -> anyhow::Result<()> {
//!     let template = Template::load(Path::new("license_header"), Some(Path::new("modelines.txt")))?;
//!
//!     let processor = Processor::new(ProcessorConfig {
//!         dry_run: true,
//!         ..ProcessorConfig::new(template, PathBuf::from("."))
//!     });
//!
//!     let mut summary = RunSummary::new();
//!     processor.run(&mut summary);
//!
//!     println!("{} files would change", summary.modified_count);
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`processor`] - Tree traversal and the two passes
//! * [`templates`] - Template loading and comment-prefix adaptation
//! * [`includes`] - The include-convention rule
//! * [`report`] - Per-file outcomes and run summaries
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`processor`]: crate::processor
//! [`templates`]: crate::templates
//! [`includes`]: crate::includes
//! [`report`]: crate::report
//! [`logging`]: crate::logging

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod file_filter;
pub mod includes;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;
pub mod templates;
