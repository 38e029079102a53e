use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

// Notion integration tokens: legacy `secret_...` and current `ntn_...`
static NOTION_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:secret|ntn)_[A-Za-z0-9]{20,}").expect("valid token pattern")
});

static BEARER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Bearer\s+[A-Za-z0-9\-_\.]+").expect("valid bearer pattern")
});

static TOKEN_FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(["']?(?:notion_token|token|api_key|secret)["']?\s*[:=]\s*)["']?[A-Za-z0-9\-_\.]{20,}["']?"#)
        .expect("valid token field pattern")
});

/// Removes Notion credentials from text before it is printed or logged.
///
/// Error chains from reqwest and the Notion API can echo request details
/// back, so anything shown to the user passes through here first.
#[derive(Clone, Copy, Default)]
pub struct SecretScrubber;

impl SecretScrubber {
    pub const fn new() -> Self {
        Self
    }

    /// Scrub a message of sensitive data
    pub fn scrub_message(&self, message: &str) -> String {
        let scrubbed = BEARER_PATTERN.replace_all(message, "Bearer [TOKEN_REDACTED]");
        let scrubbed = TOKEN_FIELD_PATTERN.replace_all(&scrubbed, "${1}[REDACTED]");
        NOTION_TOKEN_PATTERN
            .replace_all(&scrubbed, "[TOKEN_REDACTED]")
            .into_owned()
    }
}

impl fmt::Debug for SecretScrubber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretScrubber").finish()
    }
}
