//! 表格导出与导入
//!
//! 导出为带 BOM 的 UTF-8 CSV（Excel 可直接打开），导入时按表头标签把每行映射为键值对。

use std::collections::HashMap;
use std::ops::Index;
use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::errors::{PortalError, PortalResult};

const BOM: char = '\u{feff}';

/// 导出列：表头标签 + 取值函数
pub struct ExportColumn<T> {
    pub label: &'static str,
    pub value: fn(&T) -> String,
}

impl<T> ExportColumn<T> {
    pub const fn new(label: &'static str, value: fn(&T) -> String) -> Self {
        Self { label, value }
    }
}

fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn push_line<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let line: Vec<String> = fields.map(quote).collect();
    out.push_str(&line.join(","));
    out.push_str("\r\n");
}

pub fn to_csv<T>(rows: &[T], columns: &[ExportColumn<T>]) -> String {
    let mut out = String::new();
    out.push(BOM);
    push_line(&mut out, columns.iter().map(|c| c.label));
    for row in rows {
        let values: Vec<String> = columns.iter().map(|c| (c.value)(row)).collect();
        push_line(&mut out, values.iter().map(String::as_str));
    }
    out
}

pub fn write_csv<T>(path: &Path, rows: &[T], columns: &[ExportColumn<T>]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("创建导出目录失败: {:?}", parent))?;
    }
    std::fs::write(path, to_csv(rows, columns))
        .with_context(|| format!("写入导出文件失败: {:?}", path))?;
    info!("已导出 {} 行到 {:?}", rows.len(), path);
    Ok(())
}

/// 一条数据记录：按表头标签索引的字段，以及记录在文件中起始的物理行号
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvRow {
    /// 从 1 开始计数，表头是第 1 行
    pub line: usize,
    values: HashMap<String, String>,
}

impl CsvRow {
    pub fn get(&self, label: &str) -> Option<&String> {
        self.values.get(label)
    }
}

impl Index<&str> for CsvRow {
    type Output = String;

    fn index(&self, label: &str) -> &String {
        &self.values[label]
    }
}

/// 拆分为 (起始行号, 字段列表)；支持引号内的逗号、换行与 `""` 转义
///
/// 只有字段开头的 `"` 开启引号；字段中间的 `"` 按普通字符保留。
/// `\r` 只在紧跟 `\n` 时作为行尾的一部分丢弃。
fn split_records(text: &str) -> PortalResult<Vec<(usize, Vec<String>)>> {
    let mut records = Vec::new();
    let mut record = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // 当前字段是否以引号开头（闭合引号之后的内容原样拼接）
    let mut quoted = false;
    let mut line = 1;
    let mut record_line = 1;
    let mut chars = text.trim_start_matches(BOM).chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' if field.is_empty() && !quoted => {
                in_quotes = true;
                quoted = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                quoted = false;
            }
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push((record_line, std::mem::take(&mut record)));
                quoted = false;
                line += 1;
                record_line = line;
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(PortalError::Import(format!(
            "строка {}: незакрытая кавычка",
            record_line
        )));
    }
    if !field.is_empty() || !record.is_empty() || quoted {
        record.push(field);
        records.push((record_line, record));
    }
    // 空行不算记录
    records.retain(|(_, r)| !(r.len() == 1 && r[0].trim().is_empty()));
    Ok(records)
}

/// 解析 CSV 文本，第一条记录为表头
pub fn parse_csv(text: &str) -> PortalResult<Vec<CsvRow>> {
    let mut records = split_records(text)?.into_iter();
    let Some((_, header)) = records.next() else {
        return Ok(Vec::new());
    };
    let header: Vec<String> = header.into_iter().map(|h| h.trim().to_string()).collect();

    Ok(records
        .map(|(line, record)| CsvRow {
            line,
            values: header
                .iter()
                .cloned()
                .zip(record.into_iter().chain(std::iter::repeat(String::new())))
                .collect(),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    struct Row {
        name: &'static str,
        note: &'static str,
    }

    fn columns() -> Vec<ExportColumn<Row>> {
        vec![
            ExportColumn::new("Название", |r| r.name.to_string()),
            ExportColumn::new("Примечание", |r| r.note.to_string()),
        ]
    }

    #[test]
    fn test_quoting() {
        let rows = [
            Row {
                name: "Приказ, №1",
                note: "сказано \"срочно\"",
            },
            Row {
                name: "Простой",
                note: "строка 1\nстрока 2",
            },
        ];
        let csv = to_csv(&rows, &columns());
        assert!(csv.starts_with('\u{feff}'));
        assert!(csv.contains("\"Приказ, №1\",\"сказано \"\"срочно\"\"\"\r\n"));

        let parsed = parse_csv(&csv).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0]["Название"], "Приказ, №1");
        assert_eq!(parsed[0]["Примечание"], "сказано \"срочно\"");
        assert_eq!(parsed[1]["Примечание"], "строка 1\nстрока 2");
    }

    #[test]
    fn test_parse_short_rows_and_errors() {
        let parsed = parse_csv("a,b,c\n1,2\n\n").unwrap();
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0]["c"], "");

        assert!(parse_csv("").unwrap().is_empty());
        assert_eq!(
            parse_csv("a\n1\n\"open"),
            Err(PortalError::Import("строка 3: незакрытая кавычка".to_string()))
        );
    }

    #[test]
    fn test_line_numbers_skip_blank_lines_and_multiline_fields() {
        let text = "Название,Примечание\r\n\r\nА,\"две\r\nстроки\"\r\n\nБ,x\r\n";
        let parsed = parse_csv(text).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].line, 3);
        assert_eq!(parsed[0]["Примечание"], "две\r\nстроки");
        assert_eq!(parsed[1].line, 6);
        assert_eq!(parsed[1]["Название"], "Б");
    }

    #[test]
    fn test_inner_quote_and_bare_carriage_return_kept() {
        let parsed = parse_csv("a,b\nдюйм 1/2\",x\ry\n").unwrap();
        assert_eq!(parsed[0]["a"], "дюйм 1/2\"");
        assert_eq!(parsed[0]["b"], "x\ry");

        // 闭合引号之后的内容保留，不再开启引号
        let parsed = parse_csv("a\n\"ab\"c\"d\n").unwrap();
        assert_eq!(parsed[0]["a"], "abc\"d");
    }

    #[test]
    fn test_write_csv() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("exports").join("orders.csv");
        write_csv(&path, &[Row { name: "x", note: "y" }], &columns()).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(parse_csv(&text).unwrap()[0]["Название"], "x");
    }
}
