//! One resolver per field kind, plus decorators.

mod attribute;
mod decorators;
mod field_scheme;
mod free_text;
mod issue;
mod issue_type;
mod project;
mod project_category;
mod saved_filter;
mod security_level;
mod select;
mod status;
mod universal;


pub use attribute::AttributeResolver;
pub use decorators::{MultiValueResolver, ValidatingResolver};
pub use field_scheme::FieldSchemeResolver;
pub use free_text::FreeTextResolver;
pub use issue::{IssueIdResolver, IssueParentResolver};
pub use issue_type::IssueTypeResolver;
pub use project::ProjectResolver;
pub use project_category::ProjectCategoryResolver;
pub use saved_filter::SavedFilterResolver;
pub use security_level::SecurityLevelResolver;
pub use select::{CascadingSelectResolver, SelectResolver};
pub use status::StatusResolver;
pub use universal::UniversalResolver;
