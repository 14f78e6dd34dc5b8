pub mod api;
pub mod buffer;
pub mod cli;
pub mod controller;
pub mod driver;
mod logging;
pub mod modal;
pub mod notification;
pub mod paths;
pub mod settings;
