//! 滚动索引服务 - 业务能力层
//!
//! 索引文档按分区标题组织，同一分区内最新的记录排在最前。
//! 文档先解析为 [`IndexDocument`]，修改后再序列化；未修改的部分逐字节保持不变。

use crate::error::{AppResult, IndexError};
use crate::models::Record;
use crate::services::markdown::{is_heading, render_record};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::{debug, error, info};

/// 索引文档中的一个分区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSection {
    pub heading: String,
    /// 标题之后、下一个标题之前的原始行
    pub body: Vec<String>,
}

/// 索引文档
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndexDocument {
    /// 第一个标题之前的内容
    pub preamble: Vec<String>,
    pub sections: Vec<IndexSection>,
    trailing_newline: bool,
}

impl IndexDocument {
    pub fn parse(text: &str) -> Self {
        let mut lines: Vec<&str> = text.split('\n').collect();
        let trailing_newline = lines.last() == Some(&"") && lines.len() > 1;
        if trailing_newline || text.is_empty() {
            lines.pop();
        }

        let mut doc = IndexDocument {
            trailing_newline,
            ..Default::default()
        };
        for line in lines {
            if is_heading(line) {
                doc.sections.push(IndexSection {
                    heading: line.to_string(),
                    body: Vec::new(),
                });
            } else {
                match doc.sections.last_mut() {
                    Some(section) => section.body.push(line.to_string()),
                    None => doc.preamble.push(line.to_string()),
                }
            }
        }
        doc
    }

    pub fn section(&self, heading: &str) -> Option<&IndexSection> {
        self.sections.iter().find(|s| same_heading(&s.heading, heading))
    }

    /// 把记录插到分区最前面；分区不存在时在文档末尾新建
    pub fn insert(&mut self, heading: &str, records: &[Record]) {
        if records.is_empty() {
            return;
        }
        let lines: Vec<String> = records.iter().map(render_record).collect();

        if let Some(pos) = self
            .sections
            .iter()
            .position(|s| same_heading(&s.heading, heading))
        {
            let is_last = pos + 1 == self.sections.len();
            let section = &mut self.sections[pos];
            let mut at = section
                .body
                .iter()
                .take_while(|line| line.trim().is_empty())
                .count();
            if at == 0 {
                section.body.insert(0, String::new());
                at = 1;
            }
            let end = at + lines.len();
            section.body.splice(at..at, lines);
            // 原分区只有空行：新记录后补一个空行再接下一个标题
            if end == section.body.len() {
                if is_last {
                    self.trailing_newline = true;
                } else {
                    section.body.push(String::new());
                }
            }
            return;
        }

        let needs_separator = match self.last_line() {
            Some(line) => !line.trim().is_empty(),
            None => false,
        };
        if needs_separator {
            match self.sections.last_mut() {
                Some(section) => section.body.push(String::new()),
                None => self.preamble.push(String::new()),
            }
        }
        let mut body = vec![String::new()];
        body.extend(lines);
        self.sections.push(IndexSection {
            heading: heading.to_string(),
            body,
        });
        self.trailing_newline = true;
    }

    fn last_line(&self) -> Option<&str> {
        match self.sections.last() {
            Some(section) => Some(
                section
                    .body
                    .last()
                    .map(String::as_str)
                    .unwrap_or(section.heading.as_str()),
            ),
            None => self.preamble.last().map(String::as_str),
        }
    }
}

impl Display for IndexDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut lines: Vec<&str> = self.preamble.iter().map(String::as_str).collect();
        for section in &self.sections {
            lines.push(&section.heading);
            lines.extend(section.body.iter().map(String::as_str));
        }
        write!(f, "{}", lines.join("\n"))?;
        if self.trailing_newline {
            writeln!(f)?;
        }
        Ok(())
    }
}

fn same_heading(a: &str, b: &str) -> bool {
    a.trim_end() == b.trim_end()
}

/// 把新记录并入文档文本
///
/// 记录为空时原样返回。
pub fn merge_into(document: &str, heading: &str, records: &[Record]) -> String {
    if records.is_empty() {
        return document.to_string();
    }
    let mut doc = IndexDocument::parse(document);
    doc.insert(heading, records);
    doc.to_string()
}

/// 滚动索引合并器
pub struct IndexMerger {
    path: std::path::PathBuf,
}

impl IndexMerger {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 并入索引文件，返回并入的条数；失败时记录日志并返回 0
    pub fn merge_file(&self, heading: &str, records: &[Record]) -> usize {
        if records.is_empty() {
            return 0;
        }
        match self.try_merge(heading, records) {
            Ok(()) => {
                info!(
                    "📚 索引 {} 新增 {} 条 ({})",
                    self.path.display(),
                    records.len(),
                    heading
                );
                records.len()
            }
            Err(e) => {
                error!("❌ 更新索引失败: {}", e);
                0
            }
        }
    }

    fn try_merge(&self, heading: &str, records: &[Record]) -> AppResult<()> {
        let current = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("索引文件不存在，将新建: {}", self.path.display());
                String::new()
            }
            Err(source) => {
                return Err(IndexError::ReadFailed {
                    path: self.path.clone(),
                    source,
                }
                .into())
            }
        };

        let updated = merge_into(&current, heading, records);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| IndexError::WriteFailed {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(&self.path, updated).map_err(|source| IndexError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        Ok(())
    }
}
