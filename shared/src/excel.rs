use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const FIELD_FILE: &str = "file";
pub const FIELD_DRY_RUN: &str = "dry_run";
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// 导入模式：试运行只校验不落库
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    DryRun,
    Commit,
}

impl ImportMode {
    /// multipart 中 `dry_run` 字段的取值
    pub fn dry_run_value(&self) -> &'static str {
        match self {
            ImportMode::DryRun => "true",
            ImportMode::Commit => "false",
        }
    }
}

/// 试运行返回的单行结果
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportRow {
    pub row: u32,
    pub data: Map<String, Value>,
    pub errors: Vec<String>,
}

impl ImportRow {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

/// 试运行校验汇总
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationSummary {
    pub rows: Vec<ImportRow>,
    pub total: u32,
    pub has_errors: bool,
}

impl ValidationSummary {
    pub fn error_count(&self) -> usize {
        self.rows.iter().filter(|r| !r.is_valid()).count()
    }

    /// 预览表头：按首次出现的顺序收集所有列名
    pub fn columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for key in row.data.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts_errors() {
        let summary: ValidationSummary = serde_json::from_value(json!({
            "rows": [
                { "row": 2, "data": { "code": "PE", "name": "Perú" }, "errors": [] },
                { "row": 3, "data": { "code": "", "name": "X" }, "errors": ["code requerido"] }
            ],
            "total": 2,
            "has_errors": true
        }))
        .unwrap();

        assert_eq!(summary.error_count(), 1);
        assert!(summary.has_errors);
        assert_eq!(summary.columns(), vec!["code".to_string(), "name".to_string()]);
    }

    #[test]
    fn test_dry_run_values() {
        assert_eq!(ImportMode::DryRun.dry_run_value(), "true");
        assert_eq!(ImportMode::Commit.dry_run_value(), "false");
    }
}
