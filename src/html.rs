//! Low-level HTML slicing helpers for the site scrapers
//!
//! Deliberately naive string scanning tailored to the handful of page
//! structures the providers consume. Tag and attribute matching is
//! case-insensitive over ASCII. No tree is ever built; callers slice out
//! the region they need and walk tag blocks inside it.

/// Find the section between an opening tag (prefix match, attributes
/// allowed) and the next matching closing tag. Returns the HTML inside
/// the pair.
pub fn slice_between_ci<'a>(s: &'a str, open_pat: &str, close_pat: &str) -> Option<&'a str> {
    let lc = to_lowercase_fast(s);
    let open_lc = to_lowercase_fast(open_pat);
    let close_lc = to_lowercase_fast(close_pat);

    let open_idx = lc.find(&open_lc)?;
    // Jump past the '>' of the opening tag
    let after_open = s[open_idx..].find('>')? + open_idx + 1;
    let close_idx_rel = lc[after_open..].find(&close_lc)?;
    Some(&s[after_open..after_open + close_idx_rel])
}

/// Find the next complete tag block from `from` onwards. A block runs from
/// the start of the opening tag to the end of the closing tag, e.g.
/// `<option ...> ... </option>`.
pub fn next_tag_block_ci(
    s: &str,
    open_tag: &str,
    close_tag: &str,
    from: usize,
) -> Option<(usize, usize)> {
    let lc = to_lowercase_fast(s);
    let open_lc = to_lowercase_fast(open_tag);
    let close_lc = to_lowercase_fast(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// The opening-tag text of a block: everything between the leading `<` and
/// the first `>`, e.g. `li class="list-group-item"`.
pub fn opening_tag(block: &str) -> &str {
    let end = block.find('>').unwrap_or(block.len());
    block[..end].trim_start_matches('<')
}

/// Given a complete tag block like `<td ...>INNER</td>`, return the INNER
/// text without the wrapping tags (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    String::new()
}

/// Extract an attribute value from an opening-tag text. Handles
/// double-quoted, single-quoted, and bare values.
pub fn attr_value_ci<'a>(tag: &'a str, attr: &str) -> Option<&'a str> {
    let lc = to_lowercase_fast(tag);
    let needle = format!("{}=", to_lowercase_fast(attr));
    let pos = lc.find(&needle)? + needle.len();
    let rest = &tag[pos..];
    match rest.chars().next()? {
        quote @ ('"' | '\'') => {
            let val = &rest[1..];
            let end = val.find(quote)?;
            Some(&val[..end])
        }
        _ => {
            let end = rest
                .find(|c: char| c.is_whitespace() || c == '>')
                .unwrap_or(rest.len());
            Some(&rest[..end])
        }
    }
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Minimal HTML entity decoding: `&nbsp;` and `&amp;` only.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ").replace("&amp;", "&")
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// ASCII-only lowercasing for tag/attribute matching.
pub fn to_lowercase_fast(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}
