//! Parameters of the multi-reference Kaiju + Krona app: one or more reads
//! references, classification tuning, and the report filters applied when
//! summarising per taxonomic level.

use crate::database::KaijuDatabase;
use crate::errors::Result;
use crate::object_ref::{parse_ref_list, ObjectRef};
use crate::record::param_record;
use crate::validation::{require_all, require_greedy, Validate};

param_record! {
    /// Kaiju App Input Params.
    pub struct KaijuInputParams {
        workspace_name as "workspaceName": String, set set_workspace_name, with with_workspace_name;
        /// Delimited list of reads library or reads set references.
        input_refs as "inputRefs": String, set set_input_refs, with with_input_refs;
        output_biom_name as "outputBiomName": String, set set_output_biom_name, with with_output_biom_name;
        /// Ranks to report on, in caller order.
        tax_levels as "taxLevels": Vec<String>, set set_tax_levels, with with_tax_levels;
        db_type as "dbType": String, set set_db_type, with with_db_type;
        seg_filter as "segFilter": i64, set set_seg_filter, with with_seg_filter;
        min_match_length as "minMatchLength": i64, set set_min_match_length, with with_min_match_length;
        greedy_run_mode as "greedyRunMode": i64, set set_greedy_run_mode, with with_greedy_run_mode;
        greedy_allowed_mismatches as "greedyAllowedMismatches": i64,
            set set_greedy_allowed_mismatches, with with_greedy_allowed_mismatches;
        greedy_min_match_score as "greedyMinMatchScore": i64,
            set set_greedy_min_match_score, with with_greedy_min_match_score;
        greedy_max_e_value as "greedyMaxEValue": f64, set set_greedy_max_e_value, with with_greedy_max_e_value;
        /// Minimum percentage of classified reads for a taxon to be reported.
        filter_percent as "filterPercent": f64, set set_filter_percent, with with_filter_percent;
        filter_unclassified as "filterUnclassified": i64,
            set set_filter_unclassified, with with_filter_unclassified;
        full_tax_path as "fullTaxPath": i64, set set_full_tax_path, with with_full_tax_path;
    }
}

impl KaijuInputParams {
    pub const REQUIRED_PARAMS: &'static [&'static str] = &[
        "workspace_name",
        "input_refs",
        "output_biom_name",
        "tax_levels",
        "db_type",
        "seg_filter",
        "min_match_length",
        "greedy_run_mode",
        "filter_percent",
        "filter_unclassified",
        "full_tax_path",
    ];

    pub const GREEDY_PARAMS: &'static [&'static str] = &[
        "greedy_allowed_mismatches",
        "greedy_min_match_score",
        "greedy_max_e_value",
    ];

    pub fn is_greedy(&self) -> bool {
        self.greedy_run_mode() == Some(1)
    }

    /// Parsed `input_refs`; empty when unset.
    pub fn input_ref_list(&self) -> Result<Vec<ObjectRef>> {
        self.input_refs().map_or(Ok(Vec::new()), parse_ref_list)
    }

    /// The selected database, if `db_type` is set.
    pub fn database(&self) -> Result<Option<KaijuDatabase>> {
        self.db_type().map(|db| db.parse::<KaijuDatabase>()).transpose()
    }
}

impl Validate for KaijuInputParams {
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
