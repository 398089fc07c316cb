//! URL identity for cross-source matching.
//!
//! A normalized URL is trimmed, lower-cased and loses exactly one trailing `/`.
//! It is not validated, and `http://` vs `https://` stay distinct.

use crate::model::CellValue;

/// Normalize a raw cell. Anything that is not text has no identity and yields `""`.
pub fn normalize_url(value: &CellValue) -> String {
    match value {
        CellValue::Text(s) => normalize_str(s),
        _ => String::new(),
    }
}

/// Normalize a URL string: trim, lower-case, strip one trailing slash.
pub fn normalize_str(url: &str) -> String {
    let mut u = url.trim().to_lowercase();
    if u.ends_with('/') {
        u.pop();
    }
    u
}
