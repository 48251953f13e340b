//! 日志写入服务 - 业务能力层
//!
//! 只负责"把新记录追加到当天分片"能力，不关心抓取和流程

use crate::config::Config;
use crate::error::{AppResult, JournalError};
use crate::models::{Record, Section};
use crate::services::dedup::Deduplicator;
use crate::services::history_index::HistoryIndex;
use crate::services::identity_ledger::IdentityLedger;
use crate::services::markdown::render_records;
use chrono::NaiveDate;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::{debug, error, info, warn};

/// 日志写入服务
///
/// 职责：
/// - 加载历史身份键，过滤掉已写入过的记录
/// - 把剩余记录以一个分区块追加到 `<scope>/<YYYY-MM-DD>.md`
/// - 同一身份在同一日志目录内只写一次
/// - 写入失败只记录日志并返回 0，不向上传播
pub struct JournalWriter {
    history: HistoryIndex,
    use_ledger: bool,
    dedup: Deduplicator,
}

impl JournalWriter {
    pub fn new(history: HistoryIndex, use_ledger: bool) -> Self {
        Self {
            history,
            use_ledger,
            dedup: Deduplicator::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(HistoryIndex::from_config(config), config.identity_ledger)
    }

    /// 追加新记录，返回实际写入的条数
    pub fn append(
        &self,
        scope_dir: &Path,
        section: &Section,
        records: &[Record],
        date: NaiveDate,
    ) -> usize {
        self.append_records(scope_dir, section, records, date).len()
    }

    /// 追加新记录，返回实际写入的记录
    pub fn append_records(
        &self,
        scope_dir: &Path,
        section: &Section,
        records: &[Record],
        date: NaiveDate,
    ) -> Vec<Record> {
        match self.try_append(scope_dir, section, records, date) {
            Ok(written) => written,
            Err(e) => {
                error!("{} ❌ 写入日志失败: {}", section, e);
                Vec::new()
            }
        }
    }

    fn try_append(
        &self,
        scope_dir: &Path,
        section: &Section,
        records: &[Record],
        date: NaiveDate,
    ) -> AppResult<Vec<Record>> {
        let history = self.history.load(scope_dir, date)?;
        let fresh = self.dedup.exclude(self.dedup.dedup(records), &history);

        if fresh.is_empty() {
            debug!(
                "{} 没有新记录 (收到 {} 条, 历史 {} 条)",
                section,
                records.len(),
                history.len()
            );
            return Ok(Vec::new());
        }

        let path = HistoryIndex::partition_path(scope_dir, date);
        let block = format!("{}\n\n{}\n", section.heading(), render_records(&fresh));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| JournalError::WriteFailed {
                path: path.clone(),
                source,
            })?;
        file.write_all(block.as_bytes())
            .map_err(|source| JournalError::WriteFailed {
                path: path.clone(),
                source,
            })?;

        if self.use_ledger {
            let ledger = IdentityLedger::new(scope_dir);
            let keys: Vec<_> = fresh.iter().map(|r| r.identity()).collect();
            // 日志已落盘；身份记录不完整时删掉，下次加载从日志全量重建
            if let Err(e) = ledger.append(&keys, date) {
                warn!("{} ⚠️ 身份记录写入失败，将删除后重建: {}", section, e);
                if let Err(e) = ledger.discard() {
                    error!("{} ❌ 删除身份记录失败: {}", section, e);
                }
            }
        }

        info!(
            "{} ✅ 写入 {} 条到 {}",
            section,
            fresh.len(),
            path.display()
        );
        Ok(fresh)
    }
}
