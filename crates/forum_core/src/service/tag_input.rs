//! Raw tag input normalization.
//!
//! Accepted input is one or more `#word` tokens separated by commas and/or
//! whitespace, e.g. `"#rust, #sqlite #db"`.

use super::{ServiceError, ServiceResult};
use once_cell::sync::Lazy;
use regex::Regex;

static TAG_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#\w+(\s*,?\s*#\w+)*$").expect("valid tag list regex"));
static TAG_SEPARATOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[,\s]+").expect("valid tag separator regex"));

/// Joiner used for the denormalized post tag-string.
pub const TAG_STRING_SEPARATOR: &str = ", ";

/// Splits and de-duplicates raw tag input, keeping first-seen order.
///
/// Blank input yields an empty list.
pub fn normalize_tag_input(raw: &str) -> ServiceResult<Vec<String>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    if !TAG_LIST_RE.is_match(trimmed) {
        return Err(ServiceError::InvalidTags(raw.to_string()));
    }

    let mut tags: Vec<String> = Vec::new();
    for tag in TAG_SEPARATOR_RE.split(trimmed) {
        if !tags.iter().any(|seen| seen == tag) {
            tags.push(tag.to_string());
        }
    }
    Ok(tags)
}

/// Builds the tag-string stored on the post row.
pub fn tag_string(tags: &[String]) -> String {
    tags.join(TAG_STRING_SEPARATOR)
}
