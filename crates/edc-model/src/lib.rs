pub mod error;
pub mod ids;
pub mod mapping;
pub mod record;
pub mod schema;
pub mod value;

pub use error::ModelError;
pub use ids::{FieldId, FormId, ProjectId, RecordId};
pub use mapping::{Mapping, MatchSource, MatchSuggestion};
pub use record::ImportedRecord;
pub use schema::{
    Field, FieldDef, FieldLogic, FieldOption, Form, FormDef, Project, ProjectDef,
};
pub use value::Value;
