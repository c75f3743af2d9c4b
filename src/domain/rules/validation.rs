use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;

static SEMESTER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}\.[12]$").expect("semester pattern should compile"));

/// Columns whose value is missing on a row being saved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeSet<String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains(column)
    }

    pub fn insert(&mut self, column: impl Into<String>) {
        self.0.insert(column.into());
    }

    pub fn remove(&mut self, column: &str) {
        self.0.remove(column);
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let columns = self.0.iter().cloned().collect::<Vec<_>>();
        write!(f, "Campos obrigatórios vazios: {}", columns.join(", "))
    }
}

pub fn validate_row(headers: &[String], values: &[String]) -> FieldErrors {
    let mut errors = FieldErrors::default();
    for (idx, header) in headers.iter().enumerate() {
        let value = values.get(idx).map(String::as_str).unwrap_or("");
        if value.trim().is_empty() {
            errors.insert(header.clone());
        }
    }
    errors
}

pub fn is_valid_semester(value: &str) -> bool {
    SEMESTER_PATTERN.is_match(value.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_row_flags_exactly_the_blank_columns() {
        let headers = vec!["Nome".to_string(), "Curso".to_string(), "Campus".to_string()];
        let values = vec!["Ana".to_string(), "   ".to_string(), "Russas".to_string()];

        let errors = validate_row(&headers, &values);

        assert_eq!(errors.to_string(), "Campos obrigatórios vazios: Curso");
    }

    #[test]
    fn validate_row_is_empty_for_complete_rows() {
        let headers = vec!["A".to_string(), "B".to_string()];
        let values = vec!["1".to_string(), "2".to_string()];

        assert!(validate_row(&headers, &values).is_empty());
    }

    #[test]
    fn semester_accepts_year_dot_term() {
        assert!(is_valid_semester("2019.1"));
        assert!(is_valid_semester(" 2023.2 "));
    }

    #[test]
    fn semester_rejects_other_shapes() {
        for value in ["19.1", "2019.3", "2019-1", "2019.12", "a2019.1", "", "٢٠١٩.1"] {
            assert!(!is_valid_semester(value), "{value} should be rejected");
        }
    }
}
