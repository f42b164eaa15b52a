use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::error::{PortfolioError, Result};
use crate::holding::Position;

pub const NAME: &str = "Name";
pub const SHARES: &str = "Shares";
pub const AVERAGE_COST: &str = "Average Cost";
pub const CATEGORY: &str = "Category";

pub fn read_path(path: &Path) -> Result<Vec<Position>> {
    let file = File::open(path).map_err(|source| PortfolioError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    read(BufReader::new(file))
}

/// Reads positions in file order. The first column is kept as the row index,
/// the rest are located by header name.
pub fn read<R: Read>(reader: R) -> Result<Vec<Position>> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    let headers = reader.headers()?.clone();

    let name_idx = column(&headers, NAME)?;
    let shares_idx = column(&headers, SHARES)?;
    let average_cost_idx = column(&headers, AVERAGE_COST)?;
    let category_idx = column(&headers, CATEGORY)?;

    let mut positions = vec![];

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let symbol = field(&record, name_idx, row, NAME)?;
        if symbol.is_empty() {
            return Err(invalid_row(row, "empty Name"));
        }

        let shares = number(&record, shares_idx, row, SHARES)?;
        if shares <= 0.0 {
            return Err(invalid_row(row, format!("Shares must be positive, got {}", shares)));
        }

        let average_cost = number(&record, average_cost_idx, row, AVERAGE_COST)?;
        if average_cost < 0.0 {
            return Err(invalid_row(
                row,
                format!("Average Cost must not be negative, got {}", average_cost),
            ));
        }

        positions.push(Position {
            index: record.get(0).unwrap_or_default().to_string(),
            symbol: symbol.to_string(),
            shares,
            average_cost,
            category: field(&record, category_idx, row, CATEGORY)?.to_string(),
        });
    }

    if positions.is_empty() {
        return Err(PortfolioError::EmptyTable);
    }

    Ok(positions)
}

fn column(headers: &StringRecord, name: &'static str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or(PortfolioError::MissingColumn(name))
}

fn field<'r>(record: &'r StringRecord, idx: usize, row: usize, name: &str) -> Result<&'r str> {
    record
        .get(idx)
        .ok_or_else(|| invalid_row(row, format!("missing {}", name)))
}

fn number(record: &StringRecord, idx: usize, row: usize, name: &str) -> Result<f64> {
    let text = field(record, idx, row, name)?;

    match text.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid_row(row, format!("{} is not a number: {:?}", name, text))),
    }
}

fn invalid_row(row: usize, reason: impl Into<String>) -> PortfolioError {
    PortfolioError::InvalidRow {
        row,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_with_index_column() {
        let csv = "\
,Name,Shares,Average Cost,Category
0,AAPL,10,120.5,Tech
1,XOM,4,60,Energy
2,AAPL,1,150,Tech
";
        let positions = read(csv.as_bytes()).unwrap();

        assert_eq!(positions.len(), 3);

        assert_eq!(positions[0].index, "0");
        assert_eq!(positions[0].symbol, "AAPL");
        assert_eq!(positions[0].shares, 10.0);
        assert_eq!(positions[0].average_cost, 120.5);
        assert_eq!(positions[0].category, "Tech");

        assert_eq!(positions[1].symbol, "XOM");
        assert_eq!(positions[1].category, "Energy");

        // Duplicate symbols stay separate positions
        assert_eq!(positions[2].index, "2");
        assert_eq!(positions[2].symbol, "AAPL");
    }

    #[test]
    fn test_read_columns_in_any_order() {
        let csv = "\
Category,Average Cost,Name,Shares
Tech, 5.00 , AAA ,10
";
        let positions = read(csv.as_bytes()).unwrap();

        assert_eq!(positions[0].index, "Tech");
        assert_eq!(positions[0].symbol, "AAA");
        assert_eq!(positions[0].shares, 10.0);
        assert_eq!(positions[0].average_cost, 5.0);
    }

    #[test]
    fn test_missing_column() {
        let csv = ",Name,Shares,Category\n0,AAA,10,Tech\n";

        match read(csv.as_bytes()) {
            Err(PortfolioError::MissingColumn(name)) => assert_eq!(name, AVERAGE_COST),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_rows() {
        let cases = [
            ",Name,Shares,Average Cost,Category\n0,AAA,ten,5,Tech\n",
            ",Name,Shares,Average Cost,Category\n0,AAA,0,5,Tech\n",
            ",Name,Shares,Average Cost,Category\n0,AAA,10,-5,Tech\n",
            ",Name,Shares,Average Cost,Category\n0,,10,5,Tech\n",
        ];

        for csv in cases.iter() {
            match read(csv.as_bytes()) {
                Err(PortfolioError::InvalidRow { row, .. }) => assert_eq!(row, 1),
                other => panic!("unexpected result for {:?}: {:?}", csv, other),
            }
        }
    }

    #[test]
    fn test_ragged_row() {
        let csv = ",Name,Shares,Average Cost,Category\n0,AAA,10\n";

        assert!(matches!(read(csv.as_bytes()), Err(PortfolioError::Csv(_))));
    }

    #[test]
    fn test_empty_table() {
        let csv = ",Name,Shares,Average Cost,Category\n";

        assert!(matches!(read(csv.as_bytes()), Err(PortfolioError::EmptyTable)));
    }

    #[test]
    fn test_missing_file() {
        let result = read_path(Path::new("does/not/exist.csv"));

        assert!(matches!(result, Err(PortfolioError::Open { .. })));
    }
}
