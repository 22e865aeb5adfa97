//! CSV 导出
//!
//! 维护工具使用：把访客记录写成一张带表头的 CSV

use chrono::Local;
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::errors::{AppError, Result};
use crate::storage::Visitor;

/// CSV 行数据结构
#[derive(Debug, Clone, Serialize)]
pub struct CsvVisitorRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Visitor Type")]
    pub visitor_type: String,
    #[serde(rename = "Stay Duration")]
    pub stay_duration: String,
    #[serde(rename = "Age Bracket")]
    pub age_bracket: String,
    #[serde(rename = "Interests")]
    pub interest_type: String,
    #[serde(rename = "Visit Date")]
    pub visited_at: String,
}

impl From<&Visitor> for CsvVisitorRow {
    fn from(visitor: &Visitor) -> Self {
        Self {
            id: visitor.id,
            visitor_type: visitor.visitor_type.clone(),
            stay_duration: visitor.stay_duration.clone(),
            age_bracket: visitor.age_bracket.clone(),
            interest_type: visitor.interest_type.clone(),
            visited_at: visitor.visited_at.to_rfc3339(),
        }
    }
}

/// 导出访客到 CSV 文件，返回写入的行数
pub fn export_visitors_to_csv<P: AsRef<Path>>(visitors: &[Visitor], path: P) -> Result<usize> {
    let file = File::create(path.as_ref())
        .map_err(|e| AppError::file_operation(format!("Failed to create file: {}", e)))?;
    let writer = BufWriter::new(file);
    let mut csv_writer = WriterBuilder::new().from_writer(writer);

    for visitor in visitors {
        csv_writer
            .serialize(CsvVisitorRow::from(visitor))
            .map_err(|e| AppError::serialization(format!("Failed to write CSV row: {}", e)))?;
    }

    csv_writer
        .flush()
        .map_err(|e| AppError::file_operation(format!("Failed to flush CSV: {}", e)))?;

    Ok(visitors.len())
}

/// 生成默认导出文件名（带时间戳）
pub fn generate_export_filename() -> String {
    format!(
        "visitors_export_{}.csv",
        Local::now().format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::NamedTempFile;

    fn visitor(id: i64, interest: &str) -> Visitor {
        Visitor {
            id,
            visitor_type: "Couple".to_string(),
            stay_duration: "1-2 weeks".to_string(),
            age_bracket: "26-35".to_string(),
            interest_type: interest.to_string(),
            visited_at: Utc::now(),
        }
    }

    #[test]
    fn test_export_writes_header_and_rows() {
        let temp_file = NamedTempFile::new().unwrap();
        let visitors = vec![visitor(2, "Culture/Heritage"), visitor(1, "Beach")];

        let written = export_visitors_to_csv(&visitors, temp_file.path()).unwrap();
        assert_eq!(written, 2);

        let mut reader = csv::Reader::from_path(temp_file.path()).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![
                "ID",
                "Visitor Type",
                "Stay Duration",
                "Age Bracket",
                "Interests",
                "Visit Date"
            ]
        );

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "2");
        assert_eq!(&rows[0][4], "Culture/Heritage");
        assert_eq!(&rows[1][4], "Beach");
    }

    #[test]
    fn test_export_empty_list_creates_empty_file() {
        let temp_file = NamedTempFile::new().unwrap();
        assert_eq!(export_visitors_to_csv(&[], temp_file.path()).unwrap(), 0);
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let result = export_visitors_to_csv(&[visitor(1, "Food")], "/no/such/dir/out.csv");
        assert!(matches!(result, Err(AppError::FileOperation(_))));
    }

    #[test]
    fn test_generate_export_filename() {
        let filename = generate_export_filename();
        assert!(filename.starts_with("visitors_export_"));
        assert!(filename.ends_with(".csv"));
    }
}
