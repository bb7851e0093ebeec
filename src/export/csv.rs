//! Comma-separated text export

use crate::error::{Result, TableError};
use crate::model::Table;

use super::Exporter;

/// CSV exporter: header row, canonical cell text, `\n` line endings
pub struct CsvExporter {
    delimiter: u8,
}

impl CsvExporter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for CsvExporter {
    fn export(&self, table: &Table) -> Result<Vec<u8>> {
        if table.column_count() == 0 {
            return Ok(Vec::new());
        }

        let mut writer = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(Vec::new());

        writer.write_record(table.column_names()).map_err(write_error)?;
        for row in table.rows() {
            writer
                .write_record(row.cells.iter().map(|c| c.canonical_text().into_owned()))
                .map_err(write_error)?;
        }

        writer
            .into_inner()
            .map_err(|e| TableError::Io(e.into_error()))
    }
}

fn write_error(err: csv::Error) -> TableError {
    TableError::Io(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::TableLoader;
    use crate::model::CellValue;

    fn export(table: &Table) -> String {
        String::from_utf8(CsvExporter::new().export(table).unwrap()).unwrap()
    }

    #[test]
    fn test_scenario_round_trip() {
        let input = b"x,y\n1,2\n3,4\n";
        let table = TableLoader::new().load_file("data.csv", input).unwrap();
        assert_eq!(export(&table).as_bytes(), input);
    }

    #[test]
    fn test_round_trip_mixed_values() {
        let input = "id,name,score,active,joined\n\
                     1,\"Smith, Jane\",9.5,true,2024-01-31\n\
                     2,\"say \"\"hi\"\"\",,false,\n";
        let table = TableLoader::new().load_file("people.csv", input.as_bytes()).unwrap();
        assert_eq!(export(&table), input);
    }

    #[test]
    fn test_canonical_formatting() {
        // 3.0 keeps its decimal point, TRUE is lowercased, NA becomes empty
        let table = TableLoader::new()
            .load_file("t.csv", b"a,b,c\n3.0,TRUE,NA\n")
            .unwrap();
        assert_eq!(export(&table), "a,b,c\n3.0,true,\n");
    }

    #[test]
    fn test_preserves_column_and_row_order() {
        let table = Table::from_rows(
            vec!["z", "a"],
            vec![
                vec![CellValue::Int(9), CellValue::from("last")],
                vec![CellValue::Int(1), CellValue::from("first")],
            ],
        )
        .unwrap();
        assert_eq!(export(&table), "z,a\n9,last\n1,first\n");
    }

    #[test]
    fn test_deterministic() {
        let table = TableLoader::new()
            .load_file("d.csv", b"k,v\nb,2\na,1\n")
            .unwrap();
        let first = CsvExporter::new().export(&table).unwrap();
        let second = CsvExporter::new().export(&table).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_header_only_table() {
        let table = Table::from_rows::<&str>(vec!["a", "b"], vec![]).unwrap();
        assert_eq!(export(&table), "a,b\n");
    }

    #[test]
    fn test_quotes_header_when_needed() {
        let table = Table::from_rows(vec!["a,b", "c"], vec![vec![1i64.into(), 2i64.into()]]).unwrap();
        assert_eq!(export(&table), "\"a,b\",c\n1,2\n");
    }
}
