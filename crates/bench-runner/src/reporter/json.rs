//! JSON reporter for benchmark summaries and run reports

use anyhow::Result;
use serde::Serialize;

/// JSON format reporter
pub struct JsonReporter;

impl JsonReporter {
    /// Format a summary or run report as JSON
    ///
    /// # Arguments
    ///
    /// * `value` - The summary or report to format
    /// * `pretty` - Whether to pretty-print the JSON
    pub fn format<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<String> {
        let output = if pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporter::test_support;

    #[test]
    fn test_json_format_compact() {
        let output = JsonReporter::format(&test_support::summary(), false).unwrap();

        assert!(!output.contains('\n'));
        assert!(output.contains("\"name\":\"Account Switching\""));
        assert!(output.contains("\"data_quality\":\"good\""));
        assert!(output.contains("\"exclusion_rate_passed\":true"));
    }

    #[test]
    fn test_json_format_pretty() {
        let output = JsonReporter::format(&test_support::summary(), true).unwrap();

        assert!(output.contains('\n'));
        assert!(output.contains("  \"timers\": ["));
    }

    #[test]
    fn test_json_exposes_threshold_fields() {
        let output = JsonReporter::format(&test_support::summary(), false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();

        let timer = &value["timers"][1];
        assert_eq!(timer["id"], "switchAccount");
        assert!(timer["p75"].is_f64());
        assert!(timer["p95"].is_f64());
    }
}
