//! # Templates Module
//!
//! This module loads the canonical license and modeline templates and adapts
//! them to the comment syntax of each recognized file extension.
//!
//! Templates are authored with `//` line comments. For other languages the
//! leading `//` of each line is replaced by the native prefix (`;`, `#`,
//! `--`). Only a prefix at the start of a line is rewritten, so URLs such as
//! `http://example.org` inside the text are left alone.
//!
//! The module includes:
//! - [`Template`] for the canonical text pair
//! - [`CommentStyle`] for the per-extension comment prefix
//! - [`adapt`] for producing an [`AdaptedTemplate`]
//! - [`AdaptedTemplates`] for the per-run table of adapted variants
//!
//! ## Example
//!
//! ```rust
//! use boilerplate::templates::{CommentStyle, Template, adapt};
//!
//! let template = Template::new("// Copyright 2012 Example\n", "// vim: set et:\n");
//! let adapted = adapt(&template, &CommentStyle::Hash);
//!
//! assert_eq!(adapted.license, "# Copyright 2012 Example\n");
//! assert_eq!(adapted.modeline, "# vim: set et:\n");
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::{NoExpand, Regex};
use tracing::debug;

use crate::verbose_log;

/// The comment prefix the canonical templates are written with.
pub const CANONICAL_PREFIX: &str = "//";

/// The canonical license and modeline text, loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Template {
  license: String,
  modeline: String,
}

impl Template {
  /// Creates a template from literal text.
  pub fn new(license: impl Into<String>, modeline: impl Into<String>) -> Self {
    Self {
      license: license.into(),
      modeline: modeline.into(),
    }
  }

  /// Loads the license template and, if given, the modeline template.
  ///
  /// Without a modeline path no modeline is enforced; the modeline text is
  /// left empty.
  ///
  /// # Errors
  ///
  /// Returns an error if either file cannot be read or is not valid UTF-8.
  pub fn load(license_path: &Path, modeline_path: Option<&Path>) -> Result<Self> {
    verbose_log!("Loading license template from: {}", license_path.display());
    let license = fs::read_to_string(license_path)
      .with_context(|| format!("Failed to read license template file: {}", license_path.display()))?;

    let modeline = match modeline_path {
      Some(path) => {
        verbose_log!("Loading modeline template from: {}", path.display());
        fs::read_to_string(path).with_context(|| format!("Failed to read modeline template file: {}", path.display()))?
      }
      None => String::new(),
    };

    debug!(
      "Loaded templates: license {} bytes, modeline {} bytes",
      license.len(),
      modeline.len()
    );

    Ok(Self { license, modeline })
  }

  pub fn license(&self) -> &str {
    &self.license
  }

  pub fn modeline(&self) -> &str {
    &self.modeline
  }
}

/// Line-comment syntax of a file type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentStyle {
  /// `//` - C, C++ and headers; the canonical form
  Slashes,
  /// `;` - assembler sources
  Semicolon,
  /// `#` - Ruby and interface definition files
  Hash,
  /// `--` - Lua
  DoubleDash,
  /// A prefix supplied by configuration
  Custom(String),
}

impl CommentStyle {
  /// The built-in style for an extension given without its leading dot.
  pub fn builtin(extension: &str) -> Option<Self> {
    match extension {
      "cpp" | "c" | "h" => Some(Self::Slashes),
      "s" => Some(Self::Semicolon),
      "rb" | "if" => Some(Self::Hash),
      "lua" => Some(Self::DoubleDash),
      _ => None,
    }
  }

  /// The native line-comment prefix.
  pub fn prefix(&self) -> &str {
    match self {
      Self::Slashes => CANONICAL_PREFIX,
      Self::Semicolon => ";",
      Self::Hash => "#",
      Self::DoubleDash => "--",
      Self::Custom(prefix) => prefix,
    }
  }
}

/// A template rewritten into one extension's comment syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdaptedTemplate {
  pub license: String,
  pub modeline: String,
}

static LINE_START_PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(?m)^//").expect("line-start prefix regex must compile"));

/// Rewrites the canonical prefix at the start of every line of `text`.
fn rewrite_prefix(text: &str, prefix: &str) -> String {
  if prefix == CANONICAL_PREFIX {
    return text.to_string();
  }
  LINE_START_PREFIX.replace_all(text, NoExpand(prefix)).into_owned()
}

/// Adapts a canonical template to a comment style.
pub fn adapt(template: &Template, style: &CommentStyle) -> AdaptedTemplate {
  let prefix = style.prefix();
  AdaptedTemplate {
    license: rewrite_prefix(&template.license, prefix),
    modeline: rewrite_prefix(&template.modeline, prefix),
  }
}

/// Extension to comment-style table: the built-in styles plus overrides.
#[derive(Debug, Clone)]
pub struct CommentStyles {
  styles: BTreeMap<String, CommentStyle>,
}

impl Default for CommentStyles {
  fn default() -> Self {
    Self::builtin()
  }
}

impl CommentStyles {
  /// The built-in extensions only.
  pub fn builtin() -> Self {
    let styles = ["cpp", "c", "h", "s", "rb", "if", "lua"]
      .into_iter()
      .filter_map(|ext| CommentStyle::builtin(ext).map(|style| (ext.to_string(), style)))
      .collect();
    Self { styles }
  }

  /// Built-in styles extended (or overridden) by `extension -> prefix` pairs.
  pub fn with_overrides<'a, I>(overrides: I) -> Self
  where
    I: IntoIterator<Item = (&'a String, &'a String)>,
  {
    let mut table = Self::builtin();
    for (ext, prefix) in overrides {
      let style = if prefix == CANONICAL_PREFIX {
        CommentStyle::Slashes
      } else {
        CommentStyle::Custom(prefix.clone())
      };
      table.styles.insert(ext.clone(), style);
    }
    table
  }

  pub fn get(&self, extension: &str) -> Option<&CommentStyle> {
    self.styles.get(extension)
  }

  /// Recognized extensions, without leading dots.
  pub fn extensions(&self) -> impl Iterator<Item = &str> {
    self.styles.keys().map(String::as_str)
  }
}

/// Adapted templates for every recognized extension, computed once per run.
#[derive(Debug, Clone)]
pub struct AdaptedTemplates {
  by_extension: HashMap<String, AdaptedTemplate>,
}

impl AdaptedTemplates {
  pub fn new(template: &Template, styles: &CommentStyles) -> Self {
    let by_extension = styles
      .styles
      .iter()
      .map(|(ext, style)| (ext.clone(), adapt(template, style)))
      .collect();
    Self { by_extension }
  }

  /// The adapted template for an extension, or `None` if it is not
  /// recognized.
  pub fn get(&self, extension: &str) -> Option<&AdaptedTemplate> {
    self.by_extension.get(extension)
  }

  pub fn is_recognized(&self, extension: &str) -> bool {
    self.by_extension.contains_key(extension)
  }
}
