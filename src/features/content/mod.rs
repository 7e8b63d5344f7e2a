//! City-owned content: languages and their map markers.
//!
//! All routes live under the operator pages and require a gate-issued city
//! scope; the service refuses to run a query without one. Reads need viewer,
//! writes need operator.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/{locale}/operator/{city_slug}/languages` | List languages |
//! | POST | `/{locale}/operator/{city_slug}/languages` | Create a language |
//! | GET | `/{locale}/operator/{city_slug}/languages/{id}` | Language detail |
//! | PUT | `/{locale}/operator/{city_slug}/languages/{id}` | Update a language |
//! | DELETE | `/{locale}/operator/{city_slug}/languages/{id}` | Delete a language |
//! | GET | `/{locale}/operator/{city_slug}/points` | List markers |
//! | POST | `/{locale}/operator/{city_slug}/points` | Create a marker |
//! | DELETE | `/{locale}/operator/{city_slug}/points/{id}` | Delete a marker |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::ContentState;
pub use services::ContentService;
