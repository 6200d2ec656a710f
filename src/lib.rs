#![doc = "The `taskforge_auth` library crate."]
#![doc = ""]
#![doc = "Authentication and session trust for the TaskForge task tracker: password"]
#![doc = "hashing, signed session tokens, the session cookie, the in-band error"]
#![doc = "format, and the sign-up / sign-in / caller-resolution use cases."]
#![doc = "The binary (`main.rs`) wires these into an actix-web server."]

pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod store;

pub use crate::error::AppError;
