//! Placeholder value collection.
//!
//! The collector loops until it has a non-empty value for every placeholder,
//! asking a [`ValueSource`]. The interactive source prompts on the terminal;
//! the scripted source reads lines from any `BufRead`, so sessions are fully
//! drivable in tests and pipelines; the preset source serves `--set` pairs
//! and fails immediately on a missing or empty value since there is no one
//! to re-prompt.

use std::collections::{BTreeMap, BTreeSet};
use std::io::BufRead;

use console::style;
use inquire::Text;

use crate::error::{GateprepError, Result};

/// One answer channel. `Ok(None)` means the channel is exhausted, which is
/// fatal for the session.
pub trait ValueSource {
    fn read_value(&mut self, key: &str, label: &str) -> Result<Option<String>>;
}

/// Cosmetic prompt label for a placeholder key: `SITE_NAME` -> "site name".
/// Never used as the substitution key.
pub fn display_label(key: &str) -> String {
    key.to_lowercase().replace('_', " ")
}

/// Terminal prompts via inquire.
pub struct InteractiveSource;

impl ValueSource for InteractiveSource {
    fn read_value(&mut self, _key: &str, label: &str) -> Result<Option<String>> {
        let answer = Text::new(&format!("Enter {label}:"))
            .prompt()
            .map_err(|e| GateprepError::PromptFailed {
                message: e.to_string(),
            })?;
        Ok(Some(answer))
    }
}

/// Line-oriented scripted input, one value per line.
pub struct ScriptedSource<R: BufRead> {
    input: R,
}

impl<R: BufRead> ScriptedSource<R> {
    pub fn new(input: R) -> Self {
        Self { input }
    }
}

impl<R: BufRead> ValueSource for ScriptedSource<R> {
    fn read_value(&mut self, _key: &str, label: &str) -> Result<Option<String>> {
        eprintln!("Enter {label}:");
        let mut line = String::new();
        let read = self.input.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Values supplied up front with `--set KEY=VALUE`.
pub struct PresetSource {
    values: BTreeMap<String, String>,
}

impl PresetSource {
    pub fn new(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }
}

impl ValueSource for PresetSource {
    fn read_value(&mut self, key: &str, _label: &str) -> Result<Option<String>> {
        match self.values.get(key) {
            None => Err(GateprepError::MissingPresetValue {
                placeholder: key.to_string(),
            }),
            Some(value) if value.trim().is_empty() => Err(GateprepError::EmptyPresetValue {
                placeholder: key.to_string(),
            }),
            Some(value) => Ok(Some(value.clone())),
        }
    }
}

/// Parse `--set KEY=VALUE` arguments.
pub fn parse_set_pairs(pairs: &[String]) -> Result<BTreeMap<String, String>> {
    let mut values = BTreeMap::new();
    for pair in pairs {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| GateprepError::InvalidSetPair { arg: pair.clone() })?;
        values.insert(key.to_string(), value.to_string());
    }
    Ok(values)
}

/// Collect one non-empty value per placeholder, in lexicographic order.
/// Empty answers are warned about and re-asked; an exhausted source is fatal.
pub fn collect_all(
    placeholders: &BTreeSet<String>,
    source: &mut dyn ValueSource,
) -> Result<BTreeMap<String, String>> {
    let mut bindings = BTreeMap::new();
    for key in placeholders {
        let label = display_label(key);
        let value = loop {
            match source.read_value(key, &label)? {
                None => {
                    return Err(GateprepError::InputClosed {
                        placeholder: key.clone(),
                    });
                }
                Some(v) if v.trim().is_empty() => {
                    eprintln!(
                        "{} {label} cannot be empty",
                        style("warning:").yellow().bold()
                    );
                }
                Some(v) => break v,
            }
        };
        bindings.insert(key.clone(), value);
    }
    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn placeholders(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_display_label_is_cosmetic() {
        assert_eq!(display_label("SITE_NAME"), "site name");
        assert_eq!(display_label("CC_FREQUENCY"), "cc frequency");
    }

    #[test]
    fn test_scripted_collection_in_sorted_order() {
        let mut source = ScriptedSource::new(Cursor::new("alpha-value\nzulu-value\n"));
        let bindings = collect_all(&placeholders(&["ZULU", "ALPHA"]), &mut source).unwrap();
        assert_eq!(bindings.get("ALPHA").map(String::as_str), Some("alpha-value"));
        assert_eq!(bindings.get("ZULU").map(String::as_str), Some("zulu-value"));
    }

    #[test]
    fn test_empty_line_reprompts() {
        let mut source = ScriptedSource::new(Cursor::new("\n   \nfinally\n"));
        let bindings = collect_all(&placeholders(&["SITE_NAME"]), &mut source).unwrap();
        assert_eq!(bindings.get("SITE_NAME").map(String::as_str), Some("finally"));
    }

    #[test]
    fn test_exhausted_input_is_fatal() {
        let mut source = ScriptedSource::new(Cursor::new("only-one\n"));
        let err = collect_all(&placeholders(&["A", "B"]), &mut source).unwrap_err();
        match err {
            GateprepError::InputClosed { placeholder } => assert_eq!(placeholder, "B"),
            other => panic!("expected InputClosed, got {other:?}"),
        }
    }

    #[test]
    fn test_exhausted_input_after_empty_lines_is_fatal() {
        let mut source = ScriptedSource::new(Cursor::new("\n\n"));
        let err = collect_all(&placeholders(&["A"]), &mut source).unwrap_err();
        assert!(matches!(err, GateprepError::InputClosed { .. }));
    }

    #[test]
    fn test_preset_source() {
        let values = parse_set_pairs(&[
            "SITE_NAME=TestSite".to_string(),
            "SITE_ID=12345".to_string(),
        ])
        .unwrap();
        let mut source = PresetSource::new(values);
        let bindings =
            collect_all(&placeholders(&["SITE_ID", "SITE_NAME"]), &mut source).unwrap();
        assert_eq!(bindings.get("SITE_NAME").map(String::as_str), Some("TestSite"));
    }

    #[test]
    fn test_preset_missing_key_is_fatal() {
        let mut source = PresetSource::new(BTreeMap::new());
        let err = collect_all(&placeholders(&["SITE_NAME"]), &mut source).unwrap_err();
        assert!(matches!(err, GateprepError::MissingPresetValue { .. }));
    }

    #[test]
    fn test_preset_empty_value_is_fatal() {
        let values = parse_set_pairs(&["SITE_NAME=".to_string()]).unwrap();
        let mut source = PresetSource::new(values);
        let err = collect_all(&placeholders(&["SITE_NAME"]), &mut source).unwrap_err();
        assert!(matches!(err, GateprepError::EmptyPresetValue { .. }));
    }

    #[test]
    fn test_parse_set_pairs_rejects_bare_key() {
        let err = parse_set_pairs(&["SITE_NAME".to_string()]).unwrap_err();
        assert!(matches!(err, GateprepError::InvalidSetPair { .. }));
    }

    #[test]
    fn test_value_keeps_interior_content() {
        let mut source = ScriptedSource::new(Cursor::new("851.0125/12.5\n"));
        let bindings = collect_all(&placeholders(&["CC_FREQUENCY"]), &mut source).unwrap();
        assert_eq!(
            bindings.get("CC_FREQUENCY").map(String::as_str),
            Some("851.0125/12.5")
        );
    }
}
