//! Text normalization helpers for raw catalog payloads.

/// Strip HTML tags and decode the handful of entities that show up in
/// catalog descriptions. Unterminated tags swallow the rest of the input.
pub fn strip_html_tags(input: &str) -> String {
    let mut stripped = String::with_capacity(input.len());
    let mut in_tag = false;
    for c in input.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            c if !in_tag => stripped.push(c),
            _ => {}
        }
    }
    decode_entities(&stripped)
}

fn decode_entities(input: &str) -> String {
    // &amp; last, or it would re-expose entity prefixes.
    input
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Normalize assorted source date spellings to `YYYYMMDD`.
///
/// Accepts `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, and already-conformed
/// `YYYYMMDD`; missing components default to january the 1st. Anything else
/// yields `None`.
pub fn conform_release_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    // Checks run on bytes so a stray multibyte character can't land a
    // string slice on a non-boundary.
    let bytes = raw.as_bytes();
    let digits = |range: &[u8]| range.iter().all(|b| b.is_ascii_digit());
    match bytes.len() {
        4 if digits(bytes) => Some(format!("{raw}0101")),
        7 if digits(&bytes[..4]) && bytes[4] == b'-' && digits(&bytes[5..]) => {
            Some(format!("{}{}01", &raw[..4], &raw[5..]))
        }
        8 if digits(bytes) => Some(raw.to_string()),
        10 if digits(&bytes[..4])
            && bytes[4] == b'-'
            && digits(&bytes[5..7])
            && bytes[7] == b'-'
            && digits(&bytes[8..]) =>
        {
            Some(format!("{}{}{}", &raw[..4], &raw[5..7], &raw[8..]))
        }
        _ => None,
    }
}
