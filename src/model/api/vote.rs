use crate::model::mongodb::Id;

/// Shown on the voting form when a vote named no valid choice.
pub const NO_CHOICE_MESSAGE: &str = "You didn't select a choice.";

/// The submitted voting form. A missing or malformed `choice` parses as
/// `None` so that the handler can re-present the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromForm)]
pub struct VoteForm {
    pub choice: Option<Id>,
}
