//! Cookie header arithmetic.
//!
//! `Set-Cookie` is multi-valued: one header per cookie, attributes after the
//! first `;`. `Cookie` is single-valued: `name=value` pairs joined by `"; "`.

/// Extracts the `name=value` pair from a `Set-Cookie` value.
pub fn cookie_pair(set_cookie: &str) -> Option<&str> {
    let pair = set_cookie.split(';').next().unwrap_or_default().trim();
    (!pair.is_empty()).then_some(pair)
}

/// Splits a `Cookie` header value into its pairs.
pub fn split_pairs(cookie: &str) -> impl Iterator<Item = &str> {
    cookie.split(';').map(str::trim).filter(|p| !p.is_empty())
}

/// Value of the pair named `name`, if any.
pub fn pair_value<'a>(pairs: &[&'a str], name: &str) -> Option<&'a str> {
    pairs.iter().find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key.trim() == name).then_some(value.trim())
    })
}

/// Appends `pairs` to an existing `Cookie` value.
///
/// Existing pairs come first. A pair already present is not repeated and a
/// trailing separator on `existing` is not doubled. Returns `None` only when
/// there is nothing to send.
pub fn merge_cookie_header(existing: Option<&str>, pairs: &[&str]) -> Option<String> {
    let mut merged: Vec<&str> = existing.map(|e| split_pairs(e).collect()).unwrap_or_default();
    let before = merged.len();

    for pair in pairs.iter().flat_map(|p| split_pairs(p)) {
        if !merged.contains(&pair) {
            merged.push(pair);
        }
    }

    if merged.len() == before {
        // Nothing new: leave the caller's value untouched
        return existing.map(str::to_string).filter(|e| !e.trim().is_empty());
    }
    Some(merged.join("; "))
}
