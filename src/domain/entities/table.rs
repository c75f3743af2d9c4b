#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId(pub u64);

/// One table row. `values` is aligned with the owning table's headers; the id
/// lives beside the values so it can never shadow a data column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: RowId,
    pub values: Vec<String>,
}

impl Row {
    pub fn blank(id: RowId, width: usize) -> Self {
        Self {
            id,
            values: vec![String::new(); width],
        }
    }

    pub fn get(&self, col_idx: usize) -> &str {
        self.values.get(col_idx).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, col_idx: usize, value: String) -> bool {
        match self.values.get_mut(col_idx) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.values.iter().all(|value| value.is_empty())
    }
}

/// Headers plus rows in insertion order.
///
/// Every mutation consumes the table and hands back the new value, so the
/// editor holds the only copy and cancelling an edit never has to undo
/// anything in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
    next_id: u64,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a table from raw records, padding short records with empty
    /// strings and ignoring surplus values. Records that end up entirely
    /// empty are dropped after their id has been assigned.
    pub fn from_records<I>(headers: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let width = headers.len();
        let mut table = Self::new(headers);
        for mut values in records {
            values.resize(width, String::new());
            let id = table.allocate_id();
            let row = Row { id, values };
            if !row.is_blank() {
                table.rows.push(row);
            }
        }
        table
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, id: RowId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.row(id).is_some()
    }

    pub fn column_values(&self, col_idx: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(move |row| row.get(col_idx))
    }

    pub fn with_blank_row(mut self) -> (Self, RowId) {
        let id = self.allocate_id();
        self.rows.push(Row::blank(id, self.headers.len()));
        (self, id)
    }

    /// Overwrites the row carrying the same id. Unknown ids leave the table
    /// unchanged.
    pub fn with_row_replaced(mut self, mut row: Row) -> Self {
        row.values.resize(self.headers.len(), String::new());
        if let Some(slot) = self.rows.iter_mut().find(|existing| existing.id == row.id) {
            *slot = row;
        }
        self
    }

    pub fn without_row(mut self, id: RowId) -> Self {
        self.rows.retain(|row| row.id != id);
        self
    }

    fn allocate_id(&mut self) -> RowId {
        let id = RowId(self.next_id.max(1));
        self.next_id = id.0 + 1;
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["Nome".to_string(), "Campus".to_string()]
    }

    #[test]
    fn from_records_pads_short_rows_and_drops_blank_ones() {
        let table = Table::from_records(
            headers(),
            vec![
                vec!["Ana".to_string()],
                vec![String::new(), String::new()],
                vec!["Bia".to_string(), "Russas".to_string(), "extra".to_string()],
            ],
        );

        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].values, vec!["Ana", ""]);
        assert_eq!(table.rows()[1].values, vec!["Bia", "Russas"]);
        assert_ne!(table.rows()[0].id, table.rows()[1].id);
    }

    #[test]
    fn blank_row_gets_fresh_id_after_parsed_rows() {
        let table = Table::from_records(headers(), vec![vec!["Ana".to_string(), "Quixadá".to_string()]]);
        let existing = table.rows()[0].id;

        let (table, added) = table.with_blank_row();

        assert_ne!(existing, added);
        assert_eq!(table.len(), 2);
        assert!(table.row(added).is_some_and(Row::is_blank));
    }

    #[test]
    fn replace_and_remove_target_only_matching_id() {
        let table = Table::from_records(
            headers(),
            vec![
                vec!["Ana".to_string(), "Quixadá".to_string()],
                vec!["Bia".to_string(), "Russas".to_string()],
            ],
        );
        let first = table.rows()[0].clone();
        let second_id = table.rows()[1].id;

        let mut edited = first.clone();
        edited.set(1, "Crateús".to_string());
        let table = table.with_row_replaced(edited);
        assert_eq!(table.row(first.id).map(|row| row.get(1)), Some("Crateús"));

        let table = table.without_row(second_id);
        assert_eq!(table.len(), 1);
        assert!(!table.contains(second_id));
    }
}
