//! Preferred locale negotiation.

/// Language ranges from an `Accept-Language` header, highest quality first.
///
/// Entries with `q=0` or an unparsable weight are dropped. Ties keep header
/// order.
pub fn parse_accept_language(header: &str) -> Vec<(String, f32)> {
    let mut ranges: Vec<(String, f32)> = header
        .split(',')
        .filter_map(|entry| {
            let mut parts = entry.split(';');
            let tag = parts.next()?.trim();
            if tag.is_empty() {
                return None;
            }
            let mut quality = 1.0;
            for param in parts {
                if let Some(q) = param.trim().strip_prefix("q=") {
                    quality = q.trim().parse::<f32>().ok()?;
                }
            }
            (quality > 0.0).then(|| (tag.to_ascii_lowercase(), quality))
        })
        .collect();

    // stable sort keeps header order for equal weights
    ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranges
}

/// Best supported locale for a request.
///
/// Order: a supported locale cookie, then the first `Accept-Language` range
/// whose full tag or primary subtag is supported, then `default_locale`.
pub fn negotiate<'a>(
    supported: &'a [String],
    default_locale: &'a str,
    cookie: Option<&str>,
    accept_language: Option<&str>,
) -> &'a str {
    if let Some(found) = cookie.and_then(|c| find_supported(supported, c)) {
        return found;
    }

    if let Some(header) = accept_language {
        for (tag, _) in parse_accept_language(header) {
            if tag == "*" {
                break;
            }
            if let Some(found) = find_supported(supported, &tag) {
                return found;
            }
            let primary = tag.split('-').next().unwrap_or(&tag);
            if let Some(found) = find_supported(supported, primary) {
                return found;
            }
        }
    }

    default_locale
}

fn find_supported<'a>(supported: &'a [String], tag: &str) -> Option<&'a str> {
    supported
        .iter()
        .find(|l| l.eq_ignore_ascii_case(tag))
        .map(String::as_str)
}
