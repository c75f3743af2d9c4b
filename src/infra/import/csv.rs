use anyhow::{Context, Result};
use csv::{QuoteStyle, ReaderBuilder, Terminator, Trim, WriterBuilder};
use thiserror::Error;

use crate::domain::entities::table::Table;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Arquivo não contém dados válidos")]
    EmptyFile,
    #[error("Cabeçalhos não encontrados ou são inválidos")]
    NoHeaders,
    #[error("Arquivo não é texto UTF-8 válido: {0}")]
    Decode(String),
    #[error("Não foi possível ler o arquivo: {0}")]
    Unreadable(String),
    #[error("CSV malformado: {0}")]
    Malformed(String),
}

pub fn decode_table(bytes: &[u8]) -> Result<Table, ParseError> {
    let text = std::str::from_utf8(bytes).map_err(|err| ParseError::Decode(err.to_string()))?;
    parse_table(text)
}

/// Parses csv text into a table. Quoted fields may carry commas, doubled
/// quotes and line breaks, which keeps this the inverse of [`to_csv`].
/// A quote left open anywhere in the text is rejected rather than allowed to
/// swallow the lines after it.
pub fn parse_table(text: &str) -> Result<Table, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    if text.matches('"').count() % 2 != 0 {
        return Err(ParseError::Malformed("aspas sem fechamento".to_string()));
    }

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut lines = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|err| ParseError::Malformed(err.to_string()))?;
        let values = record.iter().map(unquote).collect::<Vec<_>>();
        if is_blank_line(&values) {
            continue;
        }
        lines.push(values);
    }

    let mut lines = lines.into_iter();
    let headers = lines.next().ok_or(ParseError::EmptyFile)?;
    if headers.iter().all(|header| header.is_empty()) {
        return Err(ParseError::NoHeaders);
    }

    Ok(Table::from_records(headers, lines))
}

/// Serializes the table for submission. The row id is never written; rows
/// are joined by `\n` without a trailing newline, and a table without rows
/// is just its header line followed by `\n`.
pub fn to_csv(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .quote_style(QuoteStyle::Necessary)
        .from_writer(Vec::new());

    writer
        .write_record(table.headers())
        .context("failed to write csv header")?;
    for row in table.rows() {
        writer
            .write_record(&row.values)
            .with_context(|| format!("failed to write csv row {}", row.id.0))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|err| err.into_error())
        .context("failed to flush csv writer")?;
    let mut text = String::from_utf8(bytes).context("csv output is not valid UTF-8")?;
    if !table.is_empty() && text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

pub fn sample_table() -> Table {
    let headers = ["Nome", "Curso", "Campus", "Semestre", "taxa_evasao"];
    let rows = [
        ["João", "Engenharia", "Quixadá", "2020.1", "10"],
        ["Maria", "Medicina", "Russas", "2019.2", "12"],
        ["Pedro", "Direito", "Itapajé", "2021.1", "15"],
    ];

    Table::from_records(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|v| v.to_string()).collect::<Vec<_>>()),
    )
}

// The reader only honours a quote at the very start of a field, so
// `Nome, "Campus"` arrives as `"Campus"` once trimmed.
fn unquote(value: &str) -> String {
    match value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
    {
        Some(inner) => inner.replace("\"\"", "\""),
        None => value.to_string(),
    }
}

// A whitespace-only line reads back as a single empty field.
fn is_blank_line(values: &[String]) -> bool {
    values.len() <= 1 && values.iter().all(|value| value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_values_and_skips_blank_lines() {
        let table = parse_table("\n  \nNome ,\"Campus\"\n Ana , Quixadá \n\n Bia,Russas\n")
            .expect("csv should parse");

        assert_eq!(table.headers(), ["Nome", "Campus"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].values, vec!["Ana", "Quixadá"]);
        assert_eq!(table.rows()[1].values, vec!["Bia", "Russas"]);
    }

    #[test]
    fn parse_rejects_empty_input() {
        assert_eq!(parse_table("").unwrap_err(), ParseError::EmptyFile);
        assert_eq!(parse_table("\n   \n\t\n").unwrap_err(), ParseError::EmptyFile);
    }

    #[test]
    fn parse_rejects_all_empty_headers() {
        assert_eq!(parse_table(",,,\n1,2,3,4\n").unwrap_err(), ParseError::NoHeaders);
        assert_eq!(parse_table("\"\",\"\"\n").unwrap_err(), ParseError::NoHeaders);
    }

    #[test]
    fn parse_pads_missing_values_and_drops_empty_rows() {
        let table = parse_table("A,B,C\n1\n,,\n4,5,6\n").expect("csv should parse");

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].values, vec!["1", "", ""]);
        assert_eq!(table.rows()[1].values, vec!["4", "5", "6"]);
    }

    #[test]
    fn parse_honours_quoted_commas() {
        let table = parse_table("Nome,Obs\nAna,\"Quixadá, CE\"\n").expect("csv should parse");

        assert_eq!(table.rows()[0].get(1), "Quixadá, CE");
    }

    #[test]
    fn parse_strips_quotes_after_padded_delimiters() {
        let table = parse_table("Nome, \"Campus\"\nAna, \"Russas\"\nBia , \"Dito \"\"Bia\"\"\" \n")
            .expect("csv should parse");

        assert_eq!(table.headers(), ["Nome", "Campus"]);
        assert_eq!(table.rows()[0].values, vec!["Ana", "Russas"]);
        assert_eq!(table.rows()[1].values, vec!["Bia", "Dito \"Bia\""]);
        assert_eq!(to_csv(&table).expect("serialize"), "Nome,Campus\nAna,Russas\nBia,\"Dito \"\"Bia\"\"\"");
    }

    #[test]
    fn parse_rejects_unterminated_quote() {
        let err = parse_table("Nome,Campus\nAna,\"Quixadá\nBia,Russas\nCaio,Crateús\n").unwrap_err();

        assert!(matches!(err, ParseError::Malformed(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn parse_ignores_byte_order_mark() {
        let table = parse_table("\u{feff}Nome,Campus\nAna,Russas\n").expect("csv should parse");

        assert_eq!(table.headers()[0], "Nome");
    }

    #[test]
    fn decode_reports_invalid_utf8() {
        let err = decode_table(&[0x4e, 0x6f, 0xff, 0xfe]).unwrap_err();

        assert!(matches!(err, ParseError::Decode(_)), "unexpected error: {err:?}");
    }

    #[test]
    fn empty_table_serializes_to_header_line() {
        let table = Table::new(vec!["A".to_string(), "B".to_string()]);

        assert_eq!(to_csv(&table).expect("serialize"), "A,B\n");
    }

    #[test]
    fn values_with_quotes_and_commas_are_escaped() {
        let table = Table::from_records(
            vec!["Obs".to_string()],
            vec![vec!["He said, \"hi\"".to_string()]],
        );

        assert_eq!(to_csv(&table).expect("serialize"), "Obs\n\"He said, \"\"hi\"\"\"");
    }

    #[test]
    fn rows_are_joined_without_trailing_newline() {
        let table = parse_table("A,B\n1,2\n3,4\n").expect("csv should parse");

        assert_eq!(to_csv(&table).expect("serialize"), "A,B\n1,2\n3,4");
    }

    #[test]
    fn serialized_table_parses_back_to_same_content() {
        let original = sample_table();

        let text = to_csv(&original).expect("serialize");
        let reparsed = parse_table(&text).expect("reparse");

        assert_eq!(reparsed.headers(), original.headers());
        let values = |table: &Table| {
            table
                .rows()
                .iter()
                .map(|row| row.values.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(values(&reparsed), values(&original));
    }

    #[test]
    fn quoted_values_survive_a_round_trip() {
        let original = Table::from_records(
            vec!["Nome".to_string(), "Obs".to_string()],
            vec![vec!["Ana".to_string(), "Quixadá, \"CE\"\nlinha 2".to_string()]],
        );

        let reparsed = parse_table(&to_csv(&original).expect("serialize")).expect("reparse");

        assert_eq!(reparsed.rows()[0].values, original.rows()[0].values);
    }
}
