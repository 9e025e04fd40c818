// Kaiju reference databases selectable through `db_type`.

use crate::errors::ParamsError;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Taxonomy tree shipped alongside every index.
pub const NODES_FILE: &str = "nodes.dmp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KaijuDatabase {
    /// proGenomes representative genomes.
    KaijuIndex,
    /// proGenomes with plasmids.
    KaijuIndexPg,
    /// NCBI nr, bacteria/archaea/viruses.
    KaijuIndexNr,
    /// NCBI nr including fungi and microbial eukaryotes.
    KaijuIndexNrEuk,
}

/// On-disk location of one database. Paths are resolved, not checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseFiles {
    pub dir: PathBuf,
    pub nodes: PathBuf,
    pub index: PathBuf,
}

impl KaijuDatabase {
    pub const ALL: [KaijuDatabase; 4] = [
        KaijuDatabase::KaijuIndex,
        KaijuDatabase::KaijuIndexPg,
        KaijuDatabase::KaijuIndexNr,
        KaijuDatabase::KaijuIndexNrEuk,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KaijuDatabase::KaijuIndex => "kaiju_index",
            KaijuDatabase::KaijuIndexPg => "kaiju_index_pg",
            KaijuDatabase::KaijuIndexNr => "kaiju_index_nr",
            KaijuDatabase::KaijuIndexNrEuk => "kaiju_index_nr_euk",
        }
    }

    /// FM-index file name inside the database directory.
    pub fn index_file(self) -> &'static str {
        match self {
            KaijuDatabase::KaijuIndex | KaijuDatabase::KaijuIndexPg => "kaiju_db.fmi",
            KaijuDatabase::KaijuIndexNr => "kaiju_db_nr.fmi",
            KaijuDatabase::KaijuIndexNrEuk => "kaiju_db_nr_euk.fmi",
        }
    }

    pub fn files(self, root: &Path) -> DatabaseFiles {
        let dir = root.join(self.as_str());
        DatabaseFiles {
            nodes: dir.join(NODES_FILE),
            index: dir.join(self.index_file()),
            dir,
        }
    }
}

impl FromStr for KaijuDatabase {
    type Err = ParamsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        KaijuDatabase::ALL
            .into_iter()
            .find(|db| db.as_str() == s)
            .ok_or_else(|| ParamsError::UnknownDatabase(s.to_string()))
    }
}

impl fmt::Display for KaijuDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
