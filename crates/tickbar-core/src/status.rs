use serde::{Deserialize, Serialize};

/// One line of panel output: `{"text", "tooltip", "class", "alt"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaybarStatus {
    pub text: String,
    pub tooltip: String,
    pub class: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

impl WaybarStatus {
    pub fn new(text: impl Into<String>, tooltip: impl Into<String>, class: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            tooltip: tooltip.into(),
            class: class.into(),
            alt: None,
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = Some(alt.into());
        self
    }

    /// Status shown when a module failed; the panel keeps running.
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self::new("⚠️", format!("Error: {message}"), "error")
    }

    pub fn to_json(&self) -> String {
        // A struct of strings always serializes.
        serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"text":"⚠️","tooltip":"serialization failed","class":"error"}"#.to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alt_is_omitted_when_unset() {
        let json = WaybarStatus::new("⏱️", "idle", "timer-idle").to_json();
        assert_eq!(json, r#"{"text":"⏱️","tooltip":"idle","class":"timer-idle"}"#);
    }

    #[test]
    fn alt_is_written_when_set() {
        let status = WaybarStatus::new("25:00", "t", "pomodoro-work-active").with_alt("work");
        let value: serde_json::Value = serde_json::from_str(&status.to_json()).unwrap();
        assert_eq!(value["alt"], "work");
    }

    #[test]
    fn error_status_carries_message() {
        let status = WaybarStatus::error("disk full");
        assert_eq!(status.class, "error");
        assert!(status.tooltip.contains("disk full"));
    }
}
