//! # Header Policy Module
//!
//! Decides whether a file already carries the adapted license and modeline,
//! and builds the new content when it does not. Presence is a literal
//! substring test against exactly the text that would be inserted, which is
//! what makes a second pass over a rewritten file a no-op.

use crate::file_filter::ExclusionRules;
use crate::processor::FileRecord;
use crate::templates::AdaptedTemplate;

/// What the header policy decided for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
  /// The file already has everything it needs.
  Unchanged,
  /// The file needs rewriting; carries the full new content.
  Modified(String),
}

/// Applies the header policy to one file.
///
/// Returns `None` when the file lives under an excluded directory; such files
/// are not examined and must not be reported at all.
pub fn apply(
  file: &FileRecord,
  content: &str,
  adapted: &AdaptedTemplate,
  rules: &ExclusionRules,
) -> Option<RewriteOutcome> {
  if rules.is_excluded_dir(&file.directory) {
    return None;
  }

  let needs_license = !content.contains(adapted.license.as_str()) && !rules.is_license_exempt(&file.directory, &file.path);
  let needs_modeline = !adapted.modeline.is_empty() && !content.contains(adapted.modeline.as_str());

  if !needs_license && !needs_modeline {
    return Some(RewriteOutcome::Unchanged);
  }

  let mut new_content = String::with_capacity(content.len() + adapted.license.len() + adapted.modeline.len());
  if needs_license {
    new_content.push_str(&adapted.license);
  }
  new_content.push_str(content);
  if needs_modeline {
    new_content.push_str(&adapted.modeline);
  }

  Some(RewriteOutcome::Modified(new_content))
}
