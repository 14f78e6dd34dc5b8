//! Routes for [axum::Router].

pub mod authenticate;
pub mod fallback;
pub mod health;
pub mod ping;
pub mod send_mail;
pub mod verify;
