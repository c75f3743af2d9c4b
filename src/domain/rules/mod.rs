pub mod campus;
pub mod validation;
