//! Typed parameter records for the Kaiju taxonomic classification app.
//!
//! Each record keeps its declared fields typed and carries every other payload
//! key verbatim, so newer producers can add fields without breaking older
//! consumers.

pub mod config;
pub mod database;
pub mod errors;
pub mod input_params;
pub mod object_ref;
pub mod payload;
pub mod reads_params;
pub mod record;
pub mod validation;

pub use database::KaijuDatabase;
pub use errors::ParamsError;
pub use input_params::KaijuInputParams;
pub use object_ref::ObjectRef;
pub use reads_params::KaijuReadsInputParams;
pub use record::{FieldSpec, Record};
pub use validation::Validate;
