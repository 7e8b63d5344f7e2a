//! Identity resolution and authorization.
//!
//! The session middleware resolves each request's credential to an
//! [`model::Identity`] once. Guards then run every protected route through
//! the [`gate::AuthorizationGate`], which owns the whole decision: profile
//! state, city resolution, membership role, superuser bypass. Handlers only
//! ever see scope values the gate minted.

mod jwks;
mod validator;

pub mod dto;
pub mod gate;
pub mod guards;
pub mod handler;
pub mod model;
pub mod routes;
pub mod service;
pub mod store;

pub use jwks::JwksClient;
pub use service::AuthService;
pub use validator::{CredentialError, SessionValidator};
