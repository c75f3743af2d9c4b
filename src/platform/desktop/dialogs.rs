use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::usecase::ports::prompt::ConfirmPrompt;

pub struct RfdPrompt;

impl ConfirmPrompt for RfdPrompt {
    fn confirm(&self, title: &str, description: &str) -> bool {
        MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title(title)
            .set_description(description)
            .set_buttons(MessageButtons::YesNo)
            .show()
            == MessageDialogResult::Yes
    }
}

pub fn pick_dataset_file() -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("Dados", &["csv", "sql"])
        .pick_file()
}

pub fn pick_pdf_destination(file_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .add_filter("PDF", &["pdf"])
        .set_file_name(file_name)
        .save_file()
}

pub fn show_error(title: &str, description: &str) {
    MessageDialog::new()
        .set_level(MessageLevel::Error)
        .set_title(title)
        .set_description(description)
        .set_buttons(MessageButtons::Ok)
        .show();
}
