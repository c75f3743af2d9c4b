pub mod header;
pub mod home_page;
pub mod report_page;
pub mod settings_modal;
