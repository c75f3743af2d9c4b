pub mod images;
pub mod pdf;
