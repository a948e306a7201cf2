//! Output format selection for structured subcommand output.

use std::str::FromStr;

use anyhow::{Result, bail};
use serde::Serialize;

/// Output format for structured data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default).
    #[default]
    Text,
    /// JSON — machine-parseable, pretty-printed.
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => bail!("Invalid format '{s}'. Use: text or json"),
        }
    }
}

impl OutputFormat {
    /// Serialize data to the requested format.
    ///
    /// Text output never goes through here — callers render it directly.
    ///
    /// # Errors
    /// Serialization failures, or calling this with [`Self::Text`].
    pub fn serialize<T: Serialize>(self, data: &T) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(data)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}")),
            Self::Text => bail!("Text format should not use serialize()"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_formats() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    }

    #[test]
    fn rejects_unknown_format() {
        assert!("yaml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn serializes_json() {
        #[derive(Serialize)]
        struct Probe {
            n: u32,
        }
        let out = OutputFormat::Json.serialize(&Probe { n: 3 }).unwrap();
        assert!(out.contains("\"n\": 3"));
    }

    #[test]
    fn text_refuses_serialize() {
        assert!(OutputFormat::Text.serialize(&1u32).is_err());
    }
}
