//! City directory, memberships, and the operator landing page.
//!
//! Cities are the tenancy unit: every content row belongs to exactly one
//! city, and a user's powers inside a city come from their membership role
//! there. Superusers administer the directory itself.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/cities` | List all cities (superuser) |
//! | POST | `/api/admin/cities` | Provision a city (superuser) |
//! | GET | `/api/admin/cities/{city_slug}/members` | List members (city admin) |
//! | PUT | `/api/admin/cities/{city_slug}/members` | Grant or change a role (city admin) |
//! | DELETE | `/api/admin/cities/{city_slug}/members/{user_id}` | Revoke a membership (city admin) |
//! | GET | `/{locale}/operator` | Landing page with accessible cities |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use routes::CitiesState;
pub use services::CityService;
