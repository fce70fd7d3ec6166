use anyhow::{anyhow, Result};
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::Bar;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

// Number and date handling for daily price exports
pub mod daily_format {
    use anyhow::{anyhow, Result};
    use chrono::{DateTime, NaiveDate, NaiveDateTime};
    use std::str::FromStr;

    // Accepts "1234.56" and "1,234.56"
    pub fn parse_decimal(s: &str) -> Result<f64> {
        let normalized = s.trim().replace(',', "");
        f64::from_str(&normalized).map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
    }

    // Volumes are whole shares but some exports write them as floats ("1200.0")
    pub fn parse_volume(s: &str) -> Result<u64> {
        let value = parse_decimal(s)?;
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!("Volume '{}' must be a non-negative number", s));
        }
        Ok(value.round() as u64)
    }

    // "2024-01-02", "2024-01-02 00:00:00" or "2024-01-02T00:00:00-05:00"; the
    // calendar date as written is kept, the offset is ignored
    pub fn parse_date(s: &str) -> Result<NaiveDate> {
        let s = s.trim();
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(date);
        }
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.date_naive());
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%:z") {
            return Ok(dt.date_naive());
        }
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.date())
            .map_err(|e| anyhow!("Failed to parse date '{}': {}", s, e))
    }

}

pub struct BarCsvParser;

impl BarCsvParser {
    // CSV Header: Date,Open,High,Low,Close,Volume (case-insensitive, extra columns ignored)
    // Example Row: 2024-01-02,187.15,188.44,183.89,185.64,82488700
    pub fn load_bars_from_csv(file_path: &Path) -> Result<Vec<Bar>> {
        let file = File::open(file_path)
            .map_err(|e| anyhow!("Failed to open CSV file '{}': {}", file_path.display(), e))?;
        Self::parse_bars(BufReader::new(file))
    }

    pub fn parse_bars<R: Read>(reader: R) -> Result<Vec<Bar>> {
        let mut rdr = ReaderBuilder::new().has_headers(true).trim(Trim::All).from_reader(reader);

        let headers = rdr.headers()?.clone();
        let mut bars = Vec::new();

        for (idx, result) in rdr.records().enumerate() {
            let line = idx + 2;
            let record = result.map_err(|e| anyhow!("Error reading CSV record at line {}: {}", line, e))?;
            let date = daily_format::parse_date(Self::required(&record, &headers, "Date", line)?)
                .map_err(|e| anyhow!("Error parsing 'Date' at line {}: {}", line, e))?;
            let open = Self::price(&record, &headers, "Open", line)?;
            let high = Self::price(&record, &headers, "High", line)?;
            let low = Self::price(&record, &headers, "Low", line)?;
            let close = Self::price(&record, &headers, "Close", line)?;
            let volume = daily_format::parse_volume(Self::required(&record, &headers, "Volume", line)?)
                .map_err(|e| anyhow!("Error parsing 'Volume' at line {}: {}", line, e))?;

            bars.push(Bar { date, open, high, low, close, volume });
        }
        Ok(bars)
    }

    fn required<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<&'a str> {
        Self::get_field(record, headers, name)
            .ok_or_else(|| anyhow!("Missing '{}' field in CSV record at line {}", name, line))
    }

    fn price(record: &StringRecord, headers: &StringRecord, name: &str, line: usize) -> Result<f64> {
        daily_format::parse_decimal(Self::required(record, headers, name, line)?)
            .map_err(|e| anyhow!("Error parsing '{}' at line {}: {}", name, line, e))
    }

    // Header lookup by name so column order does not matter
    fn get_field<'a>(record: &'a StringRecord, headers: &StringRecord, name: &str) -> Option<&'a str> {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
            .and_then(|pos| record.get(pos))
            .filter(|value| !value.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_test_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_load_bars_from_csv_valid_data() {
        let csv_content = "\
Date,Open,High,Low,Close,Adj Close,Volume
2024-01-02,187.15,188.44,183.89,185.64,184.9,82488700
2024-01-03,184.22,185.88,183.43,184.25,183.5,58414500";
        let tmp_file = create_test_csv(csv_content);
        let bars = BarCsvParser::load_bars_from_csv(tmp_file.path()).unwrap();

        assert_eq!(bars.len(), 2);
        assert_eq!(bars[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(bars[0].open, 187.15);
        assert_eq!(bars[0].high, 188.44);
        assert_eq!(bars[0].low, 183.89);
        assert_eq!(bars[0].close, 185.64); // Close, not Adj Close
        assert_eq!(bars[0].volume, 82488700);
        assert_eq!(bars[1].volume, 58414500);
    }

    #[test]
    fn test_columns_in_any_order_and_case() {
        let csv_content = "\
volume,close,low,high,open,date
1000,10.5,9.5,11.0,10.0,2024-02-01";
        let bars = BarCsvParser::parse_bars(csv_content.as_bytes()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].close, 10.5);
        assert_eq!(bars[0].volume, 1000);
    }

    #[test]
    fn test_load_bars_from_csv_empty_file() {
        let tmp_file = create_test_csv("Date,Open,High,Low,Close,Volume"); // Only header
        let bars = BarCsvParser::load_bars_from_csv(tmp_file.path()).unwrap();
        assert!(bars.is_empty());
    }

    #[test]
    fn test_load_bars_from_csv_missing_field() {
        let csv_content = "\
Date,Open,High,Low,Close
2024-01-02,187.15,188.44,183.89,185.64"; // Missing Volume
        let tmp_file = create_test_csv(csv_content);
        let result = BarCsvParser::load_bars_from_csv(tmp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Missing 'Volume' field"));
    }

    #[test]
    fn test_load_bars_from_csv_invalid_data_format() {
        let csv_content = "\
Date,Open,High,Low,Close,Volume
2024-01-02,invalid,188.44,183.89,185.64,100";
        let tmp_file = create_test_csv(csv_content);
        let result = BarCsvParser::load_bars_from_csv(tmp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Error parsing 'Open'"));
    }

    #[test]
    fn test_missing_file() {
        let result = BarCsvParser::load_bars_from_csv(Path::new("/nonexistent/AAPL.csv"));
        assert!(result.unwrap_err().to_string().contains("Failed to open CSV file"));
    }
}
