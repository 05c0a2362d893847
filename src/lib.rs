//! # subadmin
//!
//! Admin console for subscriptions: log in once, then manage each subscription's
//! feature flags and settings against the remote REST API.
//!
//! The library is split in two cooperating parts:
//!
//! - [`session::SessionManager`] owns the bearer token. It is built once at startup
//!   and shared through an `Arc`; the token itself lives in a pluggable
//!   [`session::TokenStore`] so it survives restarts.
//! - [`api::ResourceClient`] performs CRUD on one collection nested under a
//!   subscription and attaches the current token to every request.
//!   [`api::SubscriptionClient`] joins both collections into a single value.
//!
//! The `subadmin` binary in [`cli`] is the presentation layer on top.

pub mod api;
pub mod cli;
pub mod error;
pub mod session;
pub mod view;

pub use self::error::{Error, Result};

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
