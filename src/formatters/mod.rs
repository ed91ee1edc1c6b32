//! Entry-to-output conversion

pub mod indent;
pub mod json;
pub mod registry;
pub mod text;

pub use indent::IndentWriter;
pub use json::JsonConverter;
pub use registry::{EntryConverter, FormatterRegistry};
pub use text::DefaultStringConverter;
