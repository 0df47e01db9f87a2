const MAX_VISIBLE_CHARS: usize = 100;

/// Shortens caller-supplied text for logging and masks credential-looking tokens.
pub fn sanitize_prompt(prompt: &str) -> String {
    let trimmed = prompt.trim();

    if trimmed.is_empty() {
        return String::from("[EMPTY]");
    }

    let total_chars = trimmed.chars().count();
    let sanitized = match trimmed.char_indices().nth(MAX_VISIBLE_CHARS) {
        Some((cut, _)) => format!("{}... ({} chars total)", &trimmed[..cut], total_chars),
        None => trimmed.to_string(),
    };

    redact_sensitive_patterns(&sanitized)
}

fn redact_sensitive_patterns(text: &str) -> String {
    const PATTERNS: [&str; 6] = [
        "Bearer ",
        "authorization: ",
        "api_key=",
        "key=",
        "password=",
        "token=",
    ];

    let mut result = text.to_string();
    for pattern in PATTERNS {
        let mut search_from = 0;
        while let Some(found) = result[search_from..].find(pattern) {
            let start = search_from + found + pattern.len();
            let end = result[start..]
                .find(|c: char| c.is_whitespace() || c == '&' || c == '"' || c == '\'')
                .map(|i| start + i)
                .unwrap_or(result.len());
            if result[start..end].starts_with("[REDACTED]") || start == end {
                search_from = end;
                continue;
            }
            result.replace_range(start..end, "[REDACTED]");
            search_from = start + "[REDACTED]".len();
        }
    }

    result
}
