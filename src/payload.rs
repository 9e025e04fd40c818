//! Loading of payload documents.
//! - JSON or TOML, picked by file extension
//! - strips a leading BOM and normalizes newlines before parsing
//! - decodes straight into any parameter record

use crate::record::Record;
use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

lazy_static! {
    static ref LEADING_BOM_RE: Regex = Regex::new(r"^\u{FEFF}").expect("valid LEADING_BOM_RE");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadFormat {
    Json,
    Toml,
}

impl PayloadFormat {
    pub fn from_path(path: &Path) -> Self {
        let is_toml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            PayloadFormat::Toml
        } else {
            PayloadFormat::Json
        }
    }
}

fn strip_bom(s: &str) -> Cow<'_, str> {
    if LEADING_BOM_RE.is_match(s) {
        Cow::Owned(LEADING_BOM_RE.replace(s, "").into_owned())
    } else {
        Cow::Borrowed(s)
    }
}

fn normalize_newlines(s: &str) -> Cow<'_, str> {
    if !s.as_bytes().contains(&b'\r') {
        Cow::Borrowed(s)
    } else {
        Cow::Owned(s.replace("\r\n", "\n").replace('\r', "\n"))
    }
}

pub fn parse_payload(text: &str, format: PayloadFormat) -> Result<Value> {
    let text = strip_bom(text);
    let text = normalize_newlines(&text);
    let value: Value = match format {
        PayloadFormat::Json => serde_json::from_str(&text).context("Invalid JSON payload")?,
        PayloadFormat::Toml => toml::from_str(&text).context("Invalid TOML payload")?,
    };
    Ok(value)
}

pub fn read_payload(path: &Path) -> Result<Value> {
    let format = PayloadFormat::from_path(path);
    debug!("Reading {:?} payload from {}", format, path.display());
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read payload file: {}", path.display()))?;
    parse_payload(&text, format)
        .with_context(|| format!("Failed to parse payload file: {}", path.display()))
}

/// Reads and decodes a payload file into `R`.
pub fn load_record<R: Record>(path: &Path) -> Result<R> {
    let payload = read_payload(path)?;
    let record = R::decode(payload)
        .with_context(|| format!("Failed to decode {} from {}", R::NAME, path.display()))?;
    info!("Decoded {} from {}", R::NAME, path.display());
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reads_params::KaijuReadsInputParams;
    use std::io::Write;

    #[test]
    fn format_follows_extension() {
        assert_eq!(PayloadFormat::from_path(Path::new("p.toml")), PayloadFormat::Toml);
        assert_eq!(PayloadFormat::from_path(Path::new("p.TOML")), PayloadFormat::Toml);
        assert_eq!(PayloadFormat::from_path(Path::new("p.json")), PayloadFormat::Json);
        assert_eq!(PayloadFormat::from_path(Path::new("params")), PayloadFormat::Json);
    }

    #[test]
    fn bom_and_crlf_are_tolerated() {
        let text = "\u{FEFF}{\r\n  \"workspace_name\": \"ws1\"\r\n}";
        let value = parse_payload(text, PayloadFormat::Json).unwrap();
        assert_eq!(value["workspace_name"], "ws1");
    }

    #[test]
    fn toml_payload_decodes_like_json() {
        let text = r#"
            workspace_name = "ws1"
            reads_ref = "12345/6/7"
            tax_levels = ["phylum", "genus"]
            greedy_min_match_score = 75
        "#;
        let value = parse_payload(text, PayloadFormat::Toml).unwrap();
        let params = KaijuReadsInputParams::decode(value).unwrap();
        assert_eq!(params.reads_ref(), Some("12345/6/7"));
        assert_eq!(params.greedy_min_match_score(), Some(75.0));
    }

    #[test]
    fn load_record_names_the_file_on_type_errors() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"greedy_min_match_score": "high"}}"#).unwrap();

        let err = load_record::<KaijuReadsInputParams>(file.path()).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.contains("Failed to decode KaijuReadsInputParams"));
        assert!(chain.contains("greedy_min_match_score"));
    }

    #[test]
    fn missing_file_is_reported() {
        let err = read_payload(Path::new("/nonexistent/params.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read payload file"));
    }
}
