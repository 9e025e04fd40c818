use thiserror::Error;

/// Errors raised while decoding or validating a parameter record.
///
/// Unknown payload keys are never an error; they land in the record's
/// additional properties.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error("{record}: field '{field}' has an incompatible value: {source}")]
    TypeMismatch {
        record: &'static str,
        field: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("{record}: expected an object payload, found {found}")]
    NotAnObject {
        record: &'static str,
        found: &'static str,
    },

    #[error("{record}: must define required param '{field}'")]
    MissingParam {
        record: &'static str,
        field: &'static str,
    },

    #[error("{record}: greedy run mode requires param '{field}'")]
    MissingGreedyParam {
        record: &'static str,
        field: &'static str,
    },

    #[error("{record}: greedy_allowed_mismatches must be at least 1 in greedy run mode (got {value})")]
    GreedyMismatches { record: &'static str, value: i64 },

    #[error("bad db_type '{0}' (must be one of \"kaiju_index\", \"kaiju_index_pg\", \"kaiju_index_nr\", \"kaiju_index_nr_euk\")")]
    UnknownDatabase(String),

    #[error("invalid workspace object reference '{0}' (expected ws/obj or ws/obj/ver)")]
    InvalidObjectRef(String),
}

pub type Result<T> = std::result::Result<T, ParamsError>;
