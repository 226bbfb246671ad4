/// Runtime feature settings, read once at startup and passed down
/// explicitly. The resolver receives the fallback flag at construction time
/// rather than reading the environment deep inside the logic.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Whether the pending-submission fallback path of the metadata
    /// resolver is enabled. Defaults to on.
    pub pending_fallback_enabled: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            pending_fallback_enabled: parse_flag(
                std::env::var("PENDING_SALON_FALLBACK_ENABLED").ok().as_deref(),
            ),
        }
    }
}

/// Flag semantics: enabled unless explicitly turned off.
fn parse_flag(value: Option<&str>) -> bool {
    !matches!(value, Some("false") | Some("0") | Some("off"))
}
