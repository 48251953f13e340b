//! 日志行的渲染与解析
//!
//! 记录行格式：`* 【YYYY-MM-DD】[<title>](<url>) - <description>`

use crate::models::{IdentityKey, Record};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

/// 分区文件名中的日期格式
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 渲染一条记录行（不含换行符）
pub fn render_record(record: &Record) -> String {
    format!(
        "* 【{}】[{}]({}) - {}",
        record.observed.format(DATE_FORMAT),
        record.title,
        record.url,
        record.description
    )
}

/// 渲染多条记录，每行以 `\n` 结尾
pub fn render_records(records: &[Record]) -> String {
    records
        .iter()
        .map(|r| render_record(r) + "\n")
        .collect()
}

/// 从日志行解析出的条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedEntry {
    pub date: Option<NaiveDate>,
    pub label: String,
    pub target: String,
}

impl ParsedEntry {
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::from_parts(&self.label, &self.target)
    }
}

fn entry_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // 标题可以含 `]`，链接可以含 `)`；链接之后必须是 ` - ` 分隔符或行尾
    RE.get_or_init(|| {
        Regex::new(
            r"^\*\s+(?:【(?P<date>[^】]*)】)?\[(?P<label>.*?)\]\((?P<target>\S*?)\)(?:\s+-(?:\s|$)|\s*$)",
        )
        .expect("记录行正则无效")
    })
}

/// 解析一行日志；不符合记录行格式时返回 `None`
pub fn parse_record_line(line: &str) -> Option<ParsedEntry> {
    let caps = entry_regex().captures(line.trim_end())?;
    let label = caps.name("label").map(|m| m.as_str().trim().to_string())?;
    let target = caps.name("target").map(|m| m.as_str().to_string())?;
    if label.is_empty() && target.is_empty() {
        return None;
    }
    let date = caps
        .name("date")
        .and_then(|m| NaiveDate::parse_from_str(m.as_str(), DATE_FORMAT).ok());
    Some(ParsedEntry {
        date,
        label,
        target,
    })
}

/// 判断是否为分区标题行
pub fn is_heading(line: &str) -> bool {
    line.starts_with("## ")
}
