use std::path::Path;

use tracing::{info, warn};

use crate::domain::entities::table::Table;
use crate::infra::import::csv::{decode_table, sample_table, ParseError};

/// Table ready for the editor plus the warning to show when the example
/// dataset had to stand in for the requested file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub table: Table,
    pub warning: Option<String>,
}

impl LoadedTable {
    pub fn example() -> Self {
        Self {
            table: sample_table(),
            warning: None,
        }
    }

    fn fallback(err: &ParseError) -> Self {
        Self {
            table: sample_table(),
            warning: Some(format!("{err}. Usando dados de exemplo para demonstração.")),
        }
    }
}

pub fn load_table_from_bytes(bytes: &[u8]) -> LoadedTable {
    match decode_table(bytes) {
        Ok(table) => {
            info!(rows = table.len(), columns = table.headers().len(), "table parsed");
            LoadedTable {
                table,
                warning: None,
            }
        }
        Err(err) => {
            warn!(error = %err, "falling back to example dataset");
            LoadedTable::fallback(&err)
        }
    }
}

pub async fn read_table_file(path: &Path) -> LoadedTable {
    match tokio::fs::read(path).await {
        Ok(bytes) => load_table_from_bytes(&bytes),
        Err(err) => {
            let err = ParseError::Unreadable(format!("{}: {err}", path.display()));
            warn!(error = %err, "falling back to example dataset");
            LoadedTable::fallback(&err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_bytes_load_without_warning() {
        let loaded = load_table_from_bytes("Nome,Campus\nAna,Russas\n".as_bytes());

        assert!(loaded.warning.is_none());
        assert_eq!(loaded.table.len(), 1);
    }

    #[test]
    fn header_only_blank_file_installs_example_with_warning() {
        let loaded = load_table_from_bytes(b",,\n1,2,3\n");

        assert_eq!(loaded.table, sample_table());
        let warning = loaded.warning.expect("warning should be set");
        assert!(warning.starts_with("Cabeçalhos"), "unexpected warning: {warning}");
        assert!(warning.ends_with("Usando dados de exemplo para demonstração."));
    }

    #[test]
    fn unterminated_quote_installs_example_with_warning() {
        let loaded = load_table_from_bytes("Nome,Campus\nAna,\"Quixadá\nBia,Russas\n".as_bytes());

        assert_eq!(loaded.table, sample_table());
        let warning = loaded.warning.expect("warning should be set");
        assert!(warning.starts_with("CSV malformado"), "unexpected warning: {warning}");
    }

    #[tokio::test]
    async fn unreadable_file_installs_example_with_warning() {
        let missing = std::env::temp_dir().join("oraculo-missing-file-does-not-exist.csv");

        let loaded = read_table_file(&missing).await;

        assert_eq!(loaded.table.headers(), sample_table().headers());
        assert!(loaded.warning.is_some());
    }
}
