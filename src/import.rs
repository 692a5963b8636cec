use std::io::Cursor;

use calamine::{DataType, Range, Reader, Xls, Xlsx};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ImportError {
    #[error("Invalid file format. Please upload an Excel file.")]
    BadExtension,
    #[error("Missing required columns: {0}. Required: name, price, quantity")]
    MissingColumns(String),
    #[error("Error processing file: {0}")]
    Workbook(String),
    #[error("Error processing file: {0}")]
    Row(String),
}

#[derive(Debug, PartialEq)]
pub(crate) struct ImportedRow {
    pub(crate) name: String,
    pub(crate) description: String,
    pub(crate) price: f64,
    pub(crate) quantity: i32,
}

/// Runs before any byte of the payload is decoded.
pub(crate) fn check_extension(file_name: &str) -> Result<(), ImportError> {
    if file_name.ends_with(".xlsx") || file_name.ends_with(".xls") {
        Ok(())
    } else {
        Err(ImportError::BadExtension)
    }
}

/// Decodes the first worksheet into item rows. Headers are matched after
/// lower-casing; `description` is optional and falls back to an empty
/// string. Any bad cell fails the whole batch.
pub(crate) fn parse_rows(file_name: &str, bytes: &[u8]) -> Result<Vec<ImportedRow>, ImportError> {
    check_extension(file_name)?;

    let range = if file_name.ends_with(".xls") {
        first_sheet::<Xls<_>>(bytes)?
    } else {
        first_sheet::<Xlsx<_>>(bytes)?
    };

    let mut rows = range.rows();
    let columns: Vec<String> = rows
        .next()
        .unwrap_or_default()
        .iter()
        .map(|cell| cell.to_string().trim().to_lowercase())
        .collect();

    let position = |name: &str| columns.iter().position(|column| column == name);
    let description_col = position("description");
    let (name_col, price_col, quantity_col) =
        match (position("name"), position("price"), position("quantity")) {
            (Some(name), Some(price), Some(quantity)) => (name, price, quantity),
            (name, price, quantity) => {
                let missing = [("name", name), ("price", price), ("quantity", quantity)]
                    .iter()
                    .filter(|(_, col)| col.is_none())
                    .map(|(header, _)| *header)
                    .collect::<Vec<_>>()
                    .join(", ");
                return Err(ImportError::MissingColumns(missing));
            }
        };

    let mut imported = Vec::new();
    for (index, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, DataType::Empty)) {
            continue;
        }
        // the row number the user sees in their spreadsheet
        let row_number = index + 2;

        let name = cell(row, Some(name_col)).and_then(text_value).ok_or_else(|| {
            ImportError::Row(format!("row {}: missing value for 'name'", row_number))
        })?;

        let description = cell(row, description_col)
            .and_then(text_value)
            .unwrap_or_default();

        let price_cell = cell(row, Some(price_col)).unwrap_or(&DataType::Empty);
        let price = float_value(price_cell).ok_or_else(|| {
            ImportError::Row(format!(
                "row {}: '{}' is not a valid price",
                row_number, price_cell
            ))
        })?;

        let quantity_cell = cell(row, Some(quantity_col)).unwrap_or(&DataType::Empty);
        let quantity = int_value(quantity_cell)
            .and_then(|quantity| i32::try_from(quantity).ok())
            .ok_or_else(|| {
                ImportError::Row(format!(
                    "row {}: '{}' is not a valid quantity",
                    row_number, quantity_cell
                ))
            })?;

        imported.push(ImportedRow {
            name,
            description,
            price,
            quantity,
        });
    }

    Ok(imported)
}

fn first_sheet<R>(bytes: &[u8]) -> Result<Range<DataType>, ImportError>
where
    R: Reader<Cursor<Vec<u8>>>,
    R::Error: std::fmt::Display,
{
    let mut workbook =
        R::new(Cursor::new(bytes.to_vec())).map_err(|err| ImportError::Workbook(err.to_string()))?;

    workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::Workbook("workbook contains no sheets".to_string()))?
        .map_err(|err| ImportError::Workbook(err.to_string()))
}

fn cell<'a>(row: &'a [DataType], col: Option<usize>) -> Option<&'a DataType> {
    col.and_then(|col| row.get(col))
}

fn text_value(cell: &DataType) -> Option<String> {
    match cell {
        DataType::Empty => None,
        DataType::String(text) if text.trim().is_empty() => None,
        DataType::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn float_value(cell: &DataType) -> Option<f64> {
    match cell {
        DataType::Int(int) => Some(*int as f64),
        DataType::Float(float) => Some(*float),
        DataType::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

// Numeric cells come out of a workbook as floats; integral values are
// truncated, strings must parse as whole numbers.
fn int_value(cell: &DataType) -> Option<i64> {
    match cell {
        DataType::Int(int) => Some(*int),
        DataType::Float(float) => Some(*float as i64),
        DataType::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static SAMPLE: &[u8] = include_bytes!("../tests/fixtures/sample_items.xlsx");
    static MISSING_PRICE: &[u8] = include_bytes!("../tests/fixtures/missing_price.xlsx");
    static BAD_PRICE: &[u8] = include_bytes!("../tests/fixtures/bad_price.xlsx");

    #[test]
    fn rejects_non_spreadsheet_extensions() {
        assert!(matches!(
            check_extension("inventory.csv"),
            Err(ImportError::BadExtension)
        ));
        assert!(matches!(
            parse_rows("inventory.csv", SAMPLE),
            Err(ImportError::BadExtension)
        ));
    }

    #[test]
    fn accepts_both_excel_extensions() {
        assert!(check_extension("inventory.xlsx").is_ok());
        assert!(check_extension("legacy.xls").is_ok());
    }

    #[test]
    fn parses_rows_and_normalizes_headers() {
        // fixture headers are title-cased: Name, Description, Price, Quantity
        let rows = parse_rows("sample_items.xlsx", SAMPLE).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].name, "Sony PS5");
        assert_eq!(rows[0].description, "Next-gen console");
        assert!((rows[0].price - 499.99).abs() < 1e-9);
        assert_eq!(rows[0].quantity, 10);
        assert_eq!(rows[1].name, "iPhone 15");
        assert_eq!(rows[1].quantity, 25);
    }

    #[test]
    fn missing_description_cell_falls_back_to_empty() {
        let rows = parse_rows("sample_items.xlsx", SAMPLE).unwrap();

        assert_eq!(rows[2].name, "Logitech Mouse");
        assert_eq!(rows[2].description, "");
    }

    #[test]
    fn reports_missing_required_columns_by_name() {
        let err = parse_rows("missing_price.xlsx", MISSING_PRICE).unwrap_err();

        match err {
            ImportError::MissingColumns(columns) => assert!(columns.contains("price")),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn one_bad_row_aborts_the_whole_batch() {
        let err = parse_rows("bad_price.xlsx", BAD_PRICE).unwrap_err();

        match err {
            ImportError::Row(detail) => {
                assert!(detail.contains("price"));
                assert!(detail.contains("row 3"));
            }
            other => panic!("expected Row, got {:?}", other),
        }
    }

    #[test]
    fn garbage_bytes_are_a_processing_error() {
        assert!(matches!(
            parse_rows("inventory.xlsx", b"definitely not a workbook"),
            Err(ImportError::Workbook(_))
        ));
    }
}
