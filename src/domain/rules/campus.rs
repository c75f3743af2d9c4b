use std::collections::BTreeSet;

use crate::domain::entities::table::Table;

const CAMPUS_HEADER_HINTS: [&str; 3] = ["campus", "unidade", "local"];

pub fn campus_column(headers: &[String]) -> Option<usize> {
    headers.iter().position(|header| {
        let lowered = header.to_lowercase();
        CAMPUS_HEADER_HINTS
            .iter()
            .any(|hint| lowered.contains(hint))
    })
}

/// Distinct campus values of the table, sorted. Empty when no header looks
/// like a campus column.
pub fn derive_campus_facet(table: &Table) -> Vec<String> {
    let Some(col_idx) = campus_column(table.headers()) else {
        return Vec::new();
    };

    table
        .column_values(col_idx)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn reconcile_selection(facet: &[String], prior: &BTreeSet<String>) -> BTreeSet<String> {
    prior
        .iter()
        .filter(|campus| facet.contains(campus))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSummary {
    /// Nothing selected: the analysis covers every campus.
    Unfiltered,
    Partial { selected: usize, total: usize },
    All,
}

impl SelectionSummary {
    pub fn of(selected: usize, available: usize) -> Self {
        if selected == 0 {
            SelectionSummary::Unfiltered
        } else if selected >= available {
            SelectionSummary::All
        } else {
            SelectionSummary::Partial {
                selected,
                total: available,
            }
        }
    }

    pub fn label(self) -> String {
        match self {
            SelectionSummary::Unfiltered => {
                "Nenhum campus selecionado - todos os campus serão incluídos na análise".to_string()
            }
            SelectionSummary::Partial { selected, total } => {
                format!("{selected} de {total} campus selecionados")
            }
            SelectionSummary::All => "Todos os campus selecionados".to_string(),
        }
    }
}
