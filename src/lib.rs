pub mod app;
pub mod config;
pub mod content;
mod util;
