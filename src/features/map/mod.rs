//! Public map view.
//!
//! Anonymous, read-only. Serves published content for one city with
//! descriptions narrowed to the requested locale.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/{locale}/map/{city_slug}` | Map data for a city |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::MapState;
pub use services::MapService;
