use std::collections::BTreeSet;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::entities::analysis::AnalysisRequest;
use crate::domain::entities::edit::{EditSession, EditState, EditTarget};
use crate::domain::entities::table::{Row, RowId, Table};
use crate::domain::rules::campus::{derive_campus_facet, reconcile_selection};
use crate::domain::rules::validation::{is_valid_semester, validate_row, FieldErrors};
use crate::infra::import::csv::to_csv;
use crate::usecase::ports::prompt::ConfirmPrompt;

pub const DEFAULT_MAX_SEMESTER: &str = "2019.1";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("Linha {0} não existe")]
    RowNotFound(u64),
    #[error("Nenhuma linha está em edição")]
    NoActiveEdit,
    #[error("Coluna {0} fora do intervalo")]
    ColumnOutOfRange(usize),
    #[error("Linha {0} está em edição; salve ou cancele antes")]
    EditInProgress(u64),
    #[error("{0}")]
    Invalid(FieldErrors),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("Não há dados para análise; adicione ao menos uma linha")]
    NoRows,
    #[error("Formato de semestre inválido; use AAAA.1 ou AAAA.2 (ex.: 2019.1)")]
    InvalidSemester,
    #[error("Conclua a edição da linha atual antes de confirmar")]
    EditInProgress,
    #[error("Falha ao serializar a tabela: {0}")]
    Serialization(String),
}

/// State behind the settings modal: the table, the single edit session, the
/// campus selection and the semester bound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableEditor {
    table: Table,
    session: EditSession,
    selected_campuses: BTreeSet<String>,
    max_semester: String,
}

impl Default for TableEditor {
    fn default() -> Self {
        Self::new(Table::default())
    }
}

impl TableEditor {
    pub fn new(table: Table) -> Self {
        Self {
            table,
            session: EditSession::Idle,
            selected_campuses: BTreeSet::new(),
            max_semester: DEFAULT_MAX_SEMESTER.to_string(),
        }
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn state(&self) -> EditState {
        self.session.state()
    }

    pub fn is_editing(&self) -> bool {
        self.session.is_active()
    }

    pub fn editing_row(&self) -> Option<RowId> {
        self.session.editing_row()
    }

    pub fn scratch(&self) -> Option<&Row> {
        self.session.scratch()
    }

    pub fn errors(&self) -> FieldErrors {
        match &self.session {
            EditSession::Active { errors, .. } => errors.clone(),
            EditSession::Idle => FieldErrors::default(),
        }
    }

    pub fn can_add_row(&self) -> bool {
        !self.is_editing()
    }

    /// Edit and delete controls of rows that are not under edit.
    pub fn row_actions_enabled(&self) -> bool {
        !self.is_editing()
    }

    /// Installs a freshly loaded table, dropping any edit in progress.
    pub fn replace_table(&mut self, table: Table) {
        self.session = EditSession::Idle;
        self.commit(table);
    }

    pub fn begin_edit(&mut self, id: RowId) -> Result<(), EditError> {
        if self.session.editing_row() == Some(id) {
            return Ok(());
        }
        let row = self.table.row(id).cloned().ok_or(EditError::RowNotFound(id.0))?;

        self.cancel();
        self.session = EditSession::Active {
            target: EditTarget::Existing(id),
            scratch: row,
            errors: FieldErrors::default(),
        };
        debug!(row_id = id.0, "editing row");
        Ok(())
    }

    pub fn add_row(&mut self) -> RowId {
        self.cancel();

        let (table, id) = std::mem::take(&mut self.table).with_blank_row();
        self.commit(table);
        self.session = EditSession::Active {
            target: EditTarget::New(id),
            scratch: Row::blank(id, self.table.headers().len()),
            errors: FieldErrors::default(),
        };
        debug!(row_id = id.0, "added blank row");
        id
    }

    pub fn set_field(&mut self, col_idx: usize, value: String) -> Result<(), EditError> {
        let EditSession::Active {
            scratch, errors, ..
        } = &mut self.session
        else {
            return Err(EditError::NoActiveEdit);
        };
        let header = self
            .table
            .headers()
            .get(col_idx)
            .ok_or(EditError::ColumnOutOfRange(col_idx))?;

        if !value.trim().is_empty() {
            errors.remove(header);
        }
        scratch.set(col_idx, value);
        Ok(())
    }

    /// Validates the scratch copy and writes it back. On failure the session
    /// stays active with the offending columns recorded.
    pub fn save(&mut self) -> Result<(), EditError> {
        let EditSession::Active {
            target, scratch, ..
        } = std::mem::take(&mut self.session)
        else {
            return Err(EditError::NoActiveEdit);
        };

        let errors = validate_row(self.table.headers(), &scratch.values);
        if !errors.is_empty() {
            self.session = EditSession::Active {
                target,
                scratch,
                errors: errors.clone(),
            };
            return Err(EditError::Invalid(errors));
        }

        let table = std::mem::take(&mut self.table).with_row_replaced(scratch);
        self.commit(table);
        info!(row_id = target.row_id().0, "row saved");
        Ok(())
    }

    pub fn cancel(&mut self) {
        let session = std::mem::take(&mut self.session);
        if let EditSession::Active {
            target: EditTarget::New(id),
            ..
        } = session
        {
            let table = std::mem::take(&mut self.table).without_row(id);
            self.commit(table);
            debug!(row_id = id.0, "discarded unsaved row");
        }
    }

    /// Removes a row after the prompt accepts. Returns `Ok(false)` when the
    /// user declines.
    pub fn delete_row(&mut self, id: RowId, prompt: &dyn ConfirmPrompt) -> Result<bool, EditError> {
        if let Some(editing) = self.session.editing_row() {
            if editing != id {
                return Err(EditError::EditInProgress(editing.0));
            }
        }
        if !self.table.contains(id) {
            return Err(EditError::RowNotFound(id.0));
        }

        if !prompt.confirm("Remover linha", "Tem certeza que deseja remover esta linha?") {
            return Ok(false);
        }

        if self.session.editing_row() == Some(id) {
            self.cancel();
        }
        let table = std::mem::take(&mut self.table).without_row(id);
        self.commit(table);
        info!(row_id = id.0, "row removed");
        Ok(true)
    }

    pub fn available_campuses(&self) -> Vec<String> {
        derive_campus_facet(&self.table)
    }

    pub fn selected_campuses(&self) -> &BTreeSet<String> {
        &self.selected_campuses
    }

    pub fn toggle_campus(&mut self, campus: &str) {
        if self.selected_campuses.remove(campus) {
            return;
        }
        if self.available_campuses().iter().any(|known| known == campus) {
            self.selected_campuses.insert(campus.to_string());
        }
    }

    pub fn select_all_campuses(&mut self) {
        self.selected_campuses = self.available_campuses().into_iter().collect();
    }

    pub fn clear_campus_selection(&mut self) {
        self.selected_campuses.clear();
    }

    pub fn max_semester(&self) -> &str {
        &self.max_semester
    }

    pub fn set_max_semester(&mut self, value: String) {
        self.max_semester = value;
    }

    pub fn semester_is_valid(&self) -> bool {
        is_valid_semester(&self.max_semester)
    }

    pub fn can_confirm(&self) -> bool {
        !self.table.is_empty() && !self.is_editing() && self.semester_is_valid()
    }

    pub fn confirm(&self) -> Result<AnalysisRequest, SubmitBlocked> {
        if self.table.is_empty() {
            return Err(SubmitBlocked::NoRows);
        }
        if !self.semester_is_valid() {
            return Err(SubmitBlocked::InvalidSemester);
        }
        if self.is_editing() {
            return Err(SubmitBlocked::EditInProgress);
        }

        let csv_content =
            to_csv(&self.table).map_err(|err| SubmitBlocked::Serialization(format!("{err:#}")))?;
        Ok(AnalysisRequest {
            csv_content,
            filters: self.selected_campuses.iter().cloned().collect(),
            max_semester: self.max_semester.trim().to_string(),
        })
    }

    // Single place where the table changes, so the campus selection can never
    // drift from the rows it was derived from.
    fn commit(&mut self, table: Table) {
        self.table = table;
        let facet = derive_campus_facet(&self.table);
        self.selected_campuses = reconcile_selection(&facet, &self.selected_campuses);
    }
}
