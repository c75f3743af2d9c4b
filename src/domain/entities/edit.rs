use crate::domain::entities::table::{Row, RowId};
use crate::domain::rules::validation::FieldErrors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Existing(RowId),
    /// A row appended for this edit that has never been saved.
    New(RowId),
}

impl EditTarget {
    pub fn row_id(self) -> RowId {
        match self {
            EditTarget::Existing(id) | EditTarget::New(id) => id,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditState {
    Idle,
    EditingExisting(RowId),
    EditingNew(RowId),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Active {
        target: EditTarget,
        scratch: Row,
        errors: FieldErrors,
    },
}

impl EditSession {
    pub fn state(&self) -> EditState {
        match self {
            EditSession::Idle => EditState::Idle,
            EditSession::Active {
                target: EditTarget::Existing(id),
                ..
            } => EditState::EditingExisting(*id),
            EditSession::Active {
                target: EditTarget::New(id),
                ..
            } => EditState::EditingNew(*id),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, EditSession::Active { .. })
    }

    pub fn target(&self) -> Option<EditTarget> {
        match self {
            EditSession::Idle => None,
            EditSession::Active { target, .. } => Some(*target),
        }
    }

    pub fn editing_row(&self) -> Option<RowId> {
        self.target().map(EditTarget::row_id)
    }

    pub fn scratch(&self) -> Option<&Row> {
        match self {
            EditSession::Idle => None,
            EditSession::Active { scratch, .. } => Some(scratch),
        }
    }
}
