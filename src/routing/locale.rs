//! Locale prefix detection.
//!
//! A path carries a locale prefix when its first segment is exactly one of
//! the supported codes: `/en` and `/en/...` match, `/english` and
//! `/products/en` do not.

/// Split a leading locale segment off `path`.
///
/// Returns the locale (borrowed from `path`) and the remainder. Stripping
/// `/en` leaves an empty remainder rather than `/`. Paths without a known
/// prefix come back unchanged.
pub fn strip_locale<'a, S: AsRef<str>>(path: &'a str, locales: &[S]) -> (Option<&'a str>, &'a str) {
    let Some(tail) = path.strip_prefix('/') else {
        return (None, path);
    };

    for locale in locales {
        let locale = locale.as_ref();
        if locale.is_empty() {
            continue;
        }
        if let Some(rest) = tail.strip_prefix(locale) {
            if rest.is_empty() || rest.starts_with('/') {
                return (Some(&tail[..locale.len()]), rest);
            }
        }
    }

    (None, path)
}

/// The locale prefixing `path`, if any.
pub fn locale_of<'a, S: AsRef<str>>(path: &'a str, locales: &[S]) -> Option<&'a str> {
    strip_locale(path, locales).0
}

/// Prepend `locale` to `path`, mapping `/` to `/{locale}`.
pub fn with_locale(locale: &str, path: &str) -> String {
    if path == "/" || path.is_empty() {
        format!("/{locale}")
    } else {
        format!("/{locale}{path}")
    }
}
