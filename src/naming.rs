//! Output filename derivation.
//!
//! The downloaded file is named after its owner:
//!
//! ```text
//! first + "_" + last + "_" + email + ".jpg"
//!   → lowercase
//!   → every whitespace run becomes one "_"
//!   → drop everything outside [a-z0-9._@-]
//! ```
//!
//! Accented letters are dropped, not transliterated: `López` → `lpez`.
//! If all three fields sanitize to nothing the result is `__.jpg`; the form
//! requires every field, so this only happens for input made entirely of
//! unsupported characters.

use crate::upload::UserMetadata;

/// Extension of every artifact; the encoder always writes JPEG.
pub const OUTPUT_EXTENSION: &str = ".jpg";

/// Whitespace as a browser form sees it: Unicode `White_Space` plus the
/// byte order mark, minus NEL (U+0085).
fn is_form_whitespace(c: char) -> bool {
    match c {
        '\u{FEFF}' => true,
        '\u{0085}' => false,
        _ => c.is_whitespace(),
    }
}

fn is_retained(c: char) -> bool {
    matches!(c, 'a'..='z' | '0'..='9' | '.' | '_' | '@' | '-')
}

/// Lowercase, collapse whitespace runs to `_`, strip unsupported characters.
///
/// Total and idempotent: `sanitize_filename(&sanitize_filename(s)) == sanitize_filename(s)`.
pub fn sanitize_filename(raw: &str) -> String {
    let lowered = raw.to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut in_whitespace = false;
    for c in lowered.chars() {
        if is_form_whitespace(c) {
            if !in_whitespace {
                collapsed.push('_');
            }
            in_whitespace = true;
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    collapsed.chars().filter(|&c| is_retained(c)).collect()
}

/// Filename for the stamped photo of `metadata`'s owner.
pub fn output_filename(metadata: &UserMetadata) -> String {
    sanitize_filename(&format!(
        "{}_{}_{}{}",
        metadata.first_name, metadata.last_name, metadata.email, OUTPUT_EXTENSION
    ))
}
