//! Anime records over HTTP.
//!
//! Layout follows the usual module split:
//! * `contract` plain data shared between layers,
//! * `domain` the service and the storage port it drives,
//! * `infra` storage adapters (in-memory and SeaORM),
//! * `api::rest` DTOs, handlers, routes and access rules.

pub mod api;
pub mod contract;
pub mod domain;
pub mod infra;

pub use api::rest::routes::{access_rules, openapi, register_routes};
pub use contract::{Anime, NewAnime};
pub use domain::service::Service;
