//! Parameters of the simplified single-reads Kaiju app.
//!
//! Same tool, narrower surface: one `reads_ref`, no report filters, and a
//! real-valued greedy score.

use crate::database::KaijuDatabase;
use crate::errors::Result;
use crate::object_ref::ObjectRef;
use crate::record::param_record;
use crate::validation::{require_all, require_greedy, Validate};

param_record! {
    /// Kaiju App Input Params for a single reads object.
    pub struct KaijuReadsInputParams {
        workspace_name as "workspaceName": String, set set_workspace_name, with with_workspace_name;
        reads_ref as "readsRef": String, set set_reads_ref, with with_reads_ref;
        tax_levels as "taxLevels": Vec<String>, set set_tax_levels, with with_tax_levels;
        db_type as "dbType": String, set set_db_type, with with_db_type;
        /// 0 or 1.
        seg_filter as "segFilter": i64, set set_seg_filter, with with_seg_filter;
        /// 0 or 1.
        greedy_run_mode as "greedyRunMode": i64, set set_greedy_run_mode, with with_greedy_run_mode;
        min_match_length as "minMatchLength": i64, set set_min_match_length, with with_min_match_length;
        greedy_min_match_score as "greedyMinMatchScore": f64,
            set set_greedy_min_match_score, with with_greedy_min_match_score;
        greedy_allowed_mismatches as "greedyAllowedMismatches": i64,
            set set_greedy_allowed_mismatches, with with_greedy_allowed_mismatches;
    }
}

impl KaijuReadsInputParams {
    pub const REQUIRED_PARAMS: &'static [&'static str] = &[
        "workspace_name",
        "reads_ref",
        "tax_levels",
        "db_type",
        "seg_filter",
        "min_match_length",
        "greedy_run_mode",
    ];

    pub const GREEDY_PARAMS: &'static [&'static str] =
        &["greedy_allowed_mismatches", "greedy_min_match_score"];

    pub fn is_greedy(&self) -> bool {
        self.greedy_run_mode() == Some(1)
    }

    pub fn reads_object_ref(&self) -> Result<Option<ObjectRef>> {
        self.reads_ref().map(|r| r.parse::<ObjectRef>()).transpose()
    }

    pub fn database(&self) -> Result<Option<KaijuDatabase>> {
        self.db_type().map(|db| db.parse::<KaijuDatabase>()).transpose()
    }
}

impl Validate for KaijuReadsInputParams {
    fn validate(&self) -> Result<()> {
        require_all(self, Self::REQUIRED_PARAMS)?;
        require_greedy(
            self,
            self.greedy_run_mode(),
            self.greedy_allowed_mismatches(),
            Self::GREEDY_PARAMS,
        )?;
        self.database()?;
        Ok(())
    }
}
