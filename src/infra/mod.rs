pub mod config;
pub mod export;
pub mod http;
pub mod import;
pub mod sqlite;
