pub mod language_handler;
pub mod point_handler;

pub use language_handler::{
    create_language, delete_language, get_language, list_languages, update_language,
};
pub use point_handler::{create_point, delete_point, list_points};
