mod language;

pub use language::{Language, LanguagePoint};
