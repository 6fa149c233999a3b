use std::borrow::Cow;

const MAX_API_ERROR_CHARS: usize = 200;
const REDACTED: &str = "[REDACTED]";

/// Prefixes of credentials this crate handles: Google API keys, OAuth
/// access tokens and client secrets, ElevenLabs keys, Twilio SIDs.
const PREFIX_PATTERNS: [&str; 6] = ["AIza", "ya29.", "GOCSPX-", "1//", "sk_", "AC"];

const MARKER_PATTERNS: [&str; 10] = [
    "Authorization: Bearer ",
    "authorization: bearer ",
    "key=",
    "access_token=",
    "refresh_token=",
    "client_secret=",
    "\"access_token\":\"",
    "\"refresh_token\":\"",
    "\"client_secret\":\"",
    "\"xi-api-key\":\"",
];

fn is_secret_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | '+' | '=')
}

fn token_end(input: &str, from: usize) -> usize {
    let mut end = from;
    for (i, c) in input[from..].char_indices() {
        if is_secret_char(c) {
            end = from + i + c.len_utf8();
        } else {
            break;
        }
    }
    end
}

/// Redact `marker` plus the token that follows it. `min_token` guards short
/// prefixes ("AC") from eating ordinary words.
fn scrub_after_marker(scrubbed: &mut String, marker: &str, keep_marker: bool, min_token: usize) {
    let mut search_from = 0;
    while let Some(rel) = scrubbed[search_from..].find(marker) {
        let start = search_from + rel;
        let content_start = start + marker.len();
        let end = token_end(scrubbed, content_start);

        if end - content_start < min_token {
            search_from = content_start;
            continue;
        }

        let replace_from = if keep_marker { content_start } else { start };
        scrubbed.replace_range(replace_from..end, REDACTED);
        search_from = replace_from + REDACTED.len();
    }
}

/// Scrub known secret-like token patterns from provider error strings.
pub fn scrub_secret_patterns(input: &str) -> Cow<'_, str> {
    let hit = PREFIX_PATTERNS.iter().any(|p| input.contains(p))
        || MARKER_PATTERNS.iter().any(|m| input.contains(m));
    if !hit {
        return Cow::Borrowed(input);
    }

    let mut scrubbed = input.to_string();
    for prefix in PREFIX_PATTERNS {
        let min_token = if prefix == "AC" { 32 } else { 8 };
        scrub_after_marker(&mut scrubbed, prefix, false, min_token);
    }
    for marker in MARKER_PATTERNS {
        scrub_after_marker(&mut scrubbed, marker, true, 1);
    }
    Cow::Owned(scrubbed)
}

/// Sanitize API error text by scrubbing secrets and truncating length.
pub fn sanitize_api_error(input: &str) -> String {
    let scrubbed = scrub_secret_patterns(input);

    if scrubbed.chars().count() <= MAX_API_ERROR_CHARS {
        return scrubbed.into_owned();
    }

    let scrubbed = scrubbed.as_ref();
    let mut end = MAX_API_ERROR_CHARS;
    while end > 0 && !scrubbed.is_char_boundary(end) {
        end -= 1;
    }

    format!("{}...", &scrubbed[..end])
}
