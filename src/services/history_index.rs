//! 历史索引服务 - 业务能力层
//!
//! 扫描日志目录下的分片，重建已写入过的身份键集合。
//! 每次运行都从磁盘重建，不跨运行缓存。

use crate::config::{Config, HistoryScope};
use crate::error::JournalError;
use crate::models::IdentityKey;
use crate::services::identity_ledger::IdentityLedger;
use crate::services::markdown::{parse_record_line, DATE_FORMAT};
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 历史索引
#[derive(Debug, Clone, Copy)]
pub struct HistoryIndex {
    scope: HistoryScope,
    use_ledger: bool,
}

impl HistoryIndex {
    pub fn new(scope: HistoryScope, use_ledger: bool) -> Self {
        Self { scope, use_ledger }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.history_scope, config.identity_ledger)
    }

    /// 某天的分片路径：`<scope>/<YYYY-MM-DD>.md`
    pub fn partition_path(scope_dir: &Path, date: NaiveDate) -> PathBuf {
        scope_dir.join(format!("{}.md", date.format(DATE_FORMAT)))
    }

    /// 加载身份键集合
    ///
    /// 目录不存在时创建目录并返回空集合。
    pub fn load(&self, scope_dir: &Path, date: NaiveDate) -> Result<HashSet<IdentityKey>, JournalError> {
        if !scope_dir.exists() {
            fs::create_dir_all(scope_dir).map_err(|source| JournalError::CreateDirFailed {
                path: scope_dir.to_path_buf(),
                source,
            })?;
            debug!("已创建日志目录: {}", scope_dir.display());
            return Ok(HashSet::new());
        }

        let only_date = match self.scope {
            HistoryScope::AllDays => None,
            HistoryScope::TodayOnly => Some(date),
        };

        if !self.use_ledger {
            return Ok(Self::scan_entries(scope_dir, only_date)?
                .into_iter()
                .map(|(key, _)| key)
                .collect());
        }

        let ledger = IdentityLedger::new(scope_dir);
        if !ledger.exists() {
            let entries = Self::scan_entries(scope_dir, None)?;
            if !entries.is_empty() {
                ledger.bootstrap(&entries)?;
            }
        }

        let mut keys = ledger.load(only_date)?;
        // 当天分片也扫一遍，覆盖日志已写入而身份记录未写入的情况
        keys.extend(
            Self::scan_entries(scope_dir, Some(date))?
                .into_iter()
                .map(|(key, _)| key),
        );
        Ok(keys)
    }

    /// 扫描分片，返回 (身份键, 分片日期)
    ///
    /// `only_date` 为 `Some` 时只读取那一天的分片。
    /// 文件名不是 `YYYY-MM-DD.md` 的文件忽略；不符合记录行格式的行跳过。
    pub fn scan_entries(
        scope_dir: &Path,
        only_date: Option<NaiveDate>,
    ) -> Result<Vec<(IdentityKey, NaiveDate)>, JournalError> {
        let partitions = match only_date {
            Some(date) => {
                let path = Self::partition_path(scope_dir, date);
                if path.is_file() {
                    vec![(path, date)]
                } else {
                    Vec::new()
                }
            }
            None => Self::list_partitions(scope_dir)?,
        };

        let mut entries = Vec::new();
        for (path, date) in partitions {
            let bytes = fs::read(&path).map_err(|source| JournalError::ReadFailed {
                path: path.clone(),
                source,
            })?;
            let content = String::from_utf8_lossy(&bytes);

            let mut skipped = 0usize;
            for line in content.lines() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                match parse_record_line(line) {
                    Some(parsed) => entries.push((parsed.identity(), date)),
                    None => skipped += 1,
                }
            }
            if skipped > 0 {
                debug!("{} 中跳过 {} 行无法解析的内容", path.display(), skipped);
            }
        }
        Ok(entries)
    }

    /// 列出目录下的所有日期分片，按日期排序
    fn list_partitions(scope_dir: &Path) -> Result<Vec<(PathBuf, NaiveDate)>, JournalError> {
        let read_dir = fs::read_dir(scope_dir).map_err(|source| JournalError::ReadFailed {
            path: scope_dir.to_path_buf(),
            source,
        })?;

        let mut partitions = Vec::new();
        for entry in read_dir {
            let entry = entry.map_err(|source| JournalError::ReadFailed {
                path: scope_dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("md") {
                continue;
            }
            let date = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok());
            if let Some(date) = date {
                partitions.push((path, date));
            }
        }
        partitions.sort_by_key(|(_, date)| *date);
        Ok(partitions)
    }
}
