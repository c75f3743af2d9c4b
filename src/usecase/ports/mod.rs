pub mod prompt;
pub mod repo;
