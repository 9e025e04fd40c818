// Required-parameter checks applied after decode. Decode itself never
// enforces presence.

use crate::errors::{ParamsError, Result};
use crate::record::Record;
use serde_json::Value;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// A parameter counts as missing when unset or set to an empty string.
pub fn is_missing<R: Record>(record: &R, field: &str) -> bool {
    match record.get(field) {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

pub fn require_all<R: Record>(record: &R, fields: &[&'static str]) -> Result<()> {
    match fields.iter().find(|field| is_missing(record, field)) {
        Some(field) => Err(ParamsError::MissingParam {
            record: R::NAME,
            field: *field,
        }),
        None => Ok(()),
    }
}

/// Greedy mode needs its tuning parameters, and at least one allowed
/// mismatch.
pub fn require_greedy<R: Record>(
    record: &R,
    greedy_run_mode: Option<i64>,
    allowed_mismatches: Option<i64>,
    fields: &[&'static str],
) -> Result<()> {
    if greedy_run_mode != Some(1) {
        return Ok(());
    }
    if let Some(field) = fields.iter().find(|field| is_missing(record, field)) {
        return Err(ParamsError::MissingGreedyParam {
            record: R::NAME,
            field: *field,
        });
    }
    match allowed_mismatches {
        Some(value) if value < 1 => Err(ParamsError::GreedyMismatches {
            record: R::NAME,
            value,
        }),
        _ => Ok(()),
    }
}
