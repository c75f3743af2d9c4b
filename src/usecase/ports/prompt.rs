/// Asks the user to acknowledge a destructive action.
pub trait ConfirmPrompt {
    fn confirm(&self, title: &str, description: &str) -> bool;
}
