//! Model output cleanup.

use std::sync::OnceLock;

use regex::Regex;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| {
        Regex::new(r"(?s)^```[A-Za-z0-9_+-]*[ \t]*\r?\n(.*?)\r?\n?```$")
            .expect("valid fence regex")
    })
}

/// Remove one markdown code fence wrapping the whole response.
///
/// Models occasionally ignore the "no code fences" instruction. Fences that
/// appear inside the text are left alone.
pub fn strip_code_fences(text: &str) -> String {
    let trimmed = text.trim();
    match fence_regex().captures(trimmed) {
        Some(caps) => caps
            .get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
        None => trimmed.to_string(),
    }
}
