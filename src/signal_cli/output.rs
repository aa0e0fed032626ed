//! Parsers for signal-cli structured output.
//!
//! In JSON mode signal-cli prints one object per line (`receive`), a single
//! array (`listGroups`, `getUserStatus` on newer versions) or one object per
//! recipient (`getUserStatus` on older versions). Plain-text output is passed
//! through untouched by the adapter and never parsed here.

use super::linking::PROVISIONING_PREFIXES;
use super::traits::{AdapterError, AdapterResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registration status of one recipient, from `getUserStatus --json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatus {
    #[serde(default)]
    pub recipient: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub uuid: Option<String>,
    pub is_registered: bool,
}

impl UserStatus {
    /// Identifier as queried, falling back to the resolved number
    pub fn identifier(&self) -> Option<&str> {
        self.recipient.as_deref().or(self.number.as_deref())
    }
}

/// Parse line-delimited JSON into values, skipping blank lines
///
/// # Errors
/// Returns `AdapterError::Output` naming the first line that is not JSON.
pub fn parse_json_lines(stdout: &str) -> AdapterResult<Vec<Value>> {
    stdout
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line.trim())
                .map_err(|e| AdapterError::Output(format!("line {}: {}", idx + 1, e)))
        })
        .collect()
}

/// Parse JSON output and flatten top-level arrays into their elements
pub fn parse_json_records(stdout: &str) -> AdapterResult<Vec<Value>> {
    let mut records = Vec::new();
    for value in parse_json_lines(stdout)? {
        match value {
            Value::Array(items) => records.extend(items),
            other => records.push(other),
        }
    }
    Ok(records)
}

/// Parse `getUserStatus --json` output
///
/// Accepts both a single JSON array and one object per line.
pub fn parse_user_statuses(stdout: &str) -> AdapterResult<Vec<UserStatus>> {
    parse_json_records(stdout)?
        .into_iter()
        .map(|value| {
            serde_json::from_value(value)
                .map_err(|e| AdapterError::Output(format!("user status: {}", e)))
        })
        .collect()
}

/// Find the provisioning URI in one line of `link` output
pub fn extract_link_uri(line: &str) -> Option<&str> {
    let line = line.trim();
    PROVISIONING_PREFIXES
        .iter()
        .filter_map(|prefix| line.find(prefix))
        .min()
        .map(|start| {
            let rest = &line[start..];
            rest.split_whitespace().next().unwrap_or(rest)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_lines() {
        let stdout = concat!(
            r#"{"envelope":{"source":"+15550002222","timestamp":1}}"#,
            "\n\n",
            r#"{"envelope":{"source":"+15550003333","timestamp":2}}"#,
            "\n"
        );
        let values = parse_json_lines(stdout).unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[1]["envelope"]["source"], "+15550003333");
    }

    #[test]
    fn test_parse_json_lines_empty_output() {
        assert!(parse_json_lines("").unwrap().is_empty());
        assert!(parse_json_lines("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_json_lines_reports_bad_line() {
        let err = parse_json_lines("{\"ok\":true}\nEnvelope from: +1555\n").unwrap_err();
        match err {
            AdapterError::Output(msg) => assert!(msg.starts_with("line 2")),
            other => panic!("Expected Output error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_json_records_flattens_arrays() {
        let stdout = r#"[{"id":"a"},{"id":"b"}]"#;
        let records = parse_json_records(stdout).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "a");
    }

    #[test]
    fn test_parse_user_statuses_array() {
        let stdout = r#"[{"recipient":"+15550002222","number":"+15550002222","uuid":"3f2a","isRegistered":true},{"recipient":"+15550003333","number":null,"uuid":null,"isRegistered":false}]"#;
        let statuses = parse_user_statuses(stdout).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].number.as_deref(), Some("+15550002222"));
        assert!(statuses[0].is_registered);
        assert!(!statuses[1].is_registered);
        assert_eq!(statuses[1].uuid, None);
    }

    #[test]
    fn test_parse_user_statuses_per_line() {
        let stdout = concat!(
            r#"{"name":"+15550002222","isRegistered":true}"#,
            "\n",
            r#"{"recipient":"+15550003333","isRegistered":false}"#,
        );
        let statuses = parse_user_statuses(stdout).unwrap();
        assert_eq!(statuses.len(), 2);
        assert_eq!(statuses[0].identifier(), None);
        assert_eq!(statuses[1].identifier(), Some("+15550003333"));
        assert_eq!(statuses[1].number, None);
    }

    #[test]
    fn test_parse_user_statuses_requires_flag() {
        assert!(parse_user_statuses(r#"{"number":"+1555"}"#).is_err());
    }

    #[test]
    fn test_extract_link_uri() {
        assert_eq!(
            extract_link_uri("sgnl://linkdevice?uuid=abc&pub_key=xyz\n"),
            Some("sgnl://linkdevice?uuid=abc&pub_key=xyz")
        );
        assert_eq!(
            extract_link_uri("tsdevice:/?uuid=abc&pub_key=xyz"),
            Some("tsdevice:/?uuid=abc&pub_key=xyz")
        );
        assert_eq!(
            extract_link_uri("Link URI: sgnl://linkdevice?uuid=abc (scan me)"),
            Some("sgnl://linkdevice?uuid=abc")
        );
        assert_eq!(extract_link_uri("INFO  Starting provisioning"), None);
        assert_eq!(extract_link_uri(""), None);
    }
}
