//! Serialization of outline records.

mod json;
mod markdown;

pub use json::{to_json, write_json, JsonFormat};
pub use markdown::to_markdown;
