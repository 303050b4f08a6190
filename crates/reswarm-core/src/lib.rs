pub mod config;
pub mod logging;

pub mod gateway;
pub mod reannounce;
