pub mod map_handler;

pub use map_handler::map_view;
