use serde::{Deserialize, Serialize};

/// Knobs for a cleaning pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CleanOptions {
    /// Pass through an inline element whose kind is already open
    pub dedupe_inline: bool,

    /// Drop text made only of whitespace
    pub skip_blank_text: bool,

    /// Replace line breaks inside text with a single space
    pub normalize_line_breaks: bool,
}

impl Default for CleanOptions {
    fn default() -> Self {
        Self {
            dedupe_inline: false,
            skip_blank_text: true,
            normalize_line_breaks: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let options: CleanOptions = serde_json::from_str(r#"{"dedupeInline": true}"#).unwrap();
        assert!(options.dedupe_inline);
        assert!(options.skip_blank_text);
        assert!(options.normalize_line_breaks);
    }
}
