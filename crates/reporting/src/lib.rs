pub mod description;
pub mod json;

pub use description::DescriptionGenerator;
pub use json::{render_json, ImportDraft};
