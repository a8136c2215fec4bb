pub mod catalog;
pub mod config;
pub mod download;
pub mod error;
pub mod kind;
pub mod logging;
pub mod normalize;
pub mod server;
