pub mod json;
pub mod text;

pub use json::{JsonConfig, record_to_json, records_to_json};
pub use text::record_to_text;
