//! Guard policy switches shared by the presence and join handlers.

/// Keyword that frees an anchored user when no value is configured.
pub const DEFAULT_RELEASE_KEYWORD: &str = "#exit";

/// Presence policy settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardConfig {
    /// Kick users who show up in a second chat while anchored to another.
    pub single_chat: bool,
    /// Message content that drops a non-quarantined user's anchor. `None` disables it.
    pub release_keyword: Option<String>,
}

impl GuardConfig {
    pub fn new(single_chat: bool, release_keyword: Option<String>) -> Self {
        Self {
            single_chat,
            release_keyword: release_keyword.filter(|k| !k.trim().is_empty()),
        }
    }
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self::new(true, Some(DEFAULT_RELEASE_KEYWORD.to_string()))
    }
}
