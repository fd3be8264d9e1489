pub mod api;
pub mod cache;
pub mod config;
pub mod flows;
pub mod model;
pub mod proxy;
