//! String transformations used to derive identifiers, labels, and slugs.
//!
//! All functions are pure and only fold ASCII case. Non-ASCII characters
//! pass through untouched.

/// Normalize a raw content type name into its machine identifier.
///
/// Lower-cases ASCII letters and replaces spaces with underscores:
/// `"Movie Review"` becomes `"movie_review"`. Applying it twice yields
/// the same value.
pub fn normalize(name: &str) -> String {
    name.to_ascii_lowercase().replace(' ', "_")
}

/// Turn an identifier into a display label.
///
/// Underscores become spaces and the first letter of every word is
/// upper-cased. The remaining letters keep their case, so
/// `"movie_review"` becomes `"Movie Review"` and `"iPhone_app"` becomes
/// `"IPhone App"`.
pub fn title_case(identifier: &str) -> String {
    let spaced = identifier.replace('_', " ");
    let mut out = String::with_capacity(spaced.len());
    let mut word_start = true;

    for c in spaced.chars() {
        if word_start {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
        word_start = c.is_whitespace();
    }

    out
}

/// Pluralize an English word with a deliberately naive rule.
///
/// - ends in `y` → `y` is replaced by `ies` ("Category" → "Categories")
/// - ends in `s` → `es` is appended ("Bus" → "Buses")
/// - otherwise `s` is appended ("Post" → "Posts")
///
/// Irregular plurals and proper nouns are not handled: "Knife" becomes
/// "Knifes" and "Day" becomes "Daies". Callers who need something better
/// supply their own plural label.
pub fn pluralize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix(|c: char| c.eq_ignore_ascii_case(&'y')) {
        return format!("{stem}ies");
    }

    if word.ends_with(|c: char| c.eq_ignore_ascii_case(&'s')) {
        return format!("{word}es");
    }

    format!("{word}s")
}

/// Build a URL path segment from an identifier or label.
///
/// Lower-cases ASCII letters and replaces underscores and spaces with
/// hyphens: `"Movie Review"` and `"movie_review"` both become
/// `"movie-review"`.
pub fn slugify(identifier: &str) -> String {
    identifier
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect()
}
