//! Account profile directory.
//!
//! Accounts live in the external identity provider; the profile row here is
//! the local authorization record (role, active flag) keyed by the provider's
//! account id. All endpoints are superuser-only.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/admin/users` | List account profiles |
//! | GET | `/api/admin/users/{user_id}` | Get one account profile |
//! | PUT | `/api/admin/users/{user_id}` | Provision or update a profile |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use routes::UsersState;
pub use services::ProfileService;
