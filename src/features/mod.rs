pub mod auth;
pub mod cities;
pub mod content;
pub mod map;
pub mod users;
