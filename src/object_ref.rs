//! Workspace object references of the form `ws/obj` or `ws/obj/ver`.
//! - `ws` and `obj` are names or numeric ids
//! - `ver` is a numeric object version
//! - reference lists are split on commas, semicolons or whitespace

use crate::errors::ParamsError;
use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref OBJECT_REF_RE: Regex =
        Regex::new(r"^(?P<ws>[^/\s]+)/(?P<obj>[^/\s]+)(?:/(?P<ver>\d+))?$").expect("valid OBJECT_REF_RE");

    static ref REF_SEPARATOR_RE: Regex = Regex::new(r"[,;\s]+").expect("valid REF_SEPARATOR_RE");
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub workspace: String,
    pub object: String,
    pub version: Option<u64>,
}

impl ObjectRef {
    /// Whether both workspace and object are numeric ids rather than names.
    pub fn is_numeric(&self) -> bool {
        let numeric = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
        numeric(&self.workspace) && numeric(&self.object)
    }
}

impl FromStr for ObjectRef {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParamsError::InvalidObjectRef(s.to_string());
        let caps = OBJECT_REF_RE.captures(s.trim()).ok_or_else(invalid)?;
        let version = match caps.name("ver") {
            Some(m) => Some(m.as_str().parse::<u64>().map_err(|_| invalid())?),
            None => None,
        };
        Ok(ObjectRef {
            workspace: caps["ws"].to_string(),
            object: caps["obj"].to_string(),
            version,
        })
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.workspace, self.object)?;
        if let Some(version) = self.version {
            write!(f, "/{version}")?;
        }
        Ok(())
    }
}

/// Parses a delimited reference list. Empty entries are skipped.
pub fn parse_ref_list(s: &str) -> Result<Vec<ObjectRef>, ParamsError> {
    REF_SEPARATOR_RE
        .split(s)
        .filter(|part| !part.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_versioned_numeric_ref() {
        let r: ObjectRef = "12345/6/7".parse().unwrap();
        assert_eq!(r.workspace, "12345");
        assert_eq!(r.object, "6");
        assert_eq!(r.version, Some(7));
        assert!(r.is_numeric());
        assert_eq!(r.to_string(), "12345/6/7");
    }

    #[test]
    fn parses_named_ref_without_version() {
        let r: ObjectRef = "test_kb_kaiju_1/reads.PE".parse().unwrap();
        assert_eq!(r.workspace, "test_kb_kaiju_1");
        assert_eq!(r.object, "reads.PE");
        assert_eq!(r.version, None);
        assert!(!r.is_numeric());
    }

    #[test]
    fn rejects_malformed_refs() {
        for bad in ["12345", "1/2/x", "1//2", "1/2/3/4", ""] {
            assert!(
                matches!(bad.parse::<ObjectRef>(), Err(ParamsError::InvalidObjectRef(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn splits_mixed_separators() {
        let refs = parse_ref_list(" 1/2/3, 4/5 ;6/7/8\n").unwrap();
        let rendered: Vec<_> = refs.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["1/2/3", "4/5", "6/7/8"]);
    }

    #[test]
    fn one_bad_entry_fails_the_list() {
        assert!(parse_ref_list("1/2/3,nope").is_err());
    }
}
