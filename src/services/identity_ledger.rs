//! 身份记录文件 - 业务能力层
//!
//! 每个日志目录旁维护一个 JSON Lines 文件，逐行记录已写入的身份键，
//! 避免每次运行都重新扫描全部 markdown 分片。

use crate::error::JournalError;
use crate::models::IdentityKey;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 身份记录文件名
pub const LEDGER_FILE_NAME: &str = ".identities.jsonl";

/// 一行身份记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub key: IdentityKey,
    pub date: NaiveDate,
}

/// 单个日志目录的身份记录
pub struct IdentityLedger {
    path: PathBuf,
}

impl IdentityLedger {
    pub fn new(scope_dir: impl AsRef<Path>) -> Self {
        Self {
            path: scope_dir.as_ref().join(LEDGER_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// 读取身份键；`only_date` 为 `Some` 时只返回该日期的键
    ///
    /// 文件不存在视为空；无法解析的行跳过。
    pub fn load(&self, only_date: Option<NaiveDate>) -> Result<HashSet<IdentityKey>, JournalError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(HashSet::new()),
            Err(source) => {
                return Err(JournalError::ReadFailed {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut keys = HashSet::new();
        let mut skipped = 0usize;
        for line in content.lines().filter(|l| !l.trim().is_empty()) {
            match serde_json::from_str::<LedgerEntry>(line) {
                Ok(entry) if only_date.map_or(true, |d| d == entry.date) => {
                    keys.insert(entry.key);
                }
                Ok(_) => {}
                Err(_) => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("身份记录 {} 中跳过 {} 行无法解析的内容", self.path.display(), skipped);
        }
        Ok(keys)
    }

    /// 追加身份键
    pub fn append<'a>(
        &self,
        keys: impl IntoIterator<Item = &'a IdentityKey>,
        date: NaiveDate,
    ) -> Result<usize, JournalError> {
        let mut buf = String::new();
        let mut count = 0;
        for key in keys {
            let entry = LedgerEntry {
                key: key.clone(),
                date,
            };
            buf.push_str(&serde_json::to_string(&entry)?);
            buf.push('\n');
            count += 1;
        }
        if count == 0 {
            return Ok(0);
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| JournalError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;
        file.write_all(buf.as_bytes())
            .map_err(|source| JournalError::WriteFailed {
                path: self.path.clone(),
                source,
            })?;
        Ok(count)
    }

    /// 删除身份记录文件，下次加载时会从日志重建
    pub fn discard(&self) -> Result<(), JournalError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(JournalError::WriteFailed {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// 用日志扫描结果重建身份记录（仅在记录文件缺失时调用）
    pub fn bootstrap(&self, entries: &[(IdentityKey, NaiveDate)]) -> Result<usize, JournalError> {
        let mut written = 0;
        // 同一 (键, 日期) 只写一次
        let mut seen = HashSet::new();
        let mut buf = String::new();
        for (key, date) in entries {
            if !seen.insert((key.clone(), *date)) {
                continue;
            }
            let entry = LedgerEntry {
                key: key.clone(),
                date: *date,
            };
            buf.push_str(&serde_json::to_string(&entry)?);
            buf.push('\n');
            written += 1;
        }
        fs::write(&self.path, buf).map_err(|source| JournalError::WriteFailed {
            path: self.path.clone(),
            source,
        })?;
        info!("🗂️ 已从日志重建身份记录: {} ({} 条)", self.path.display(), written);
        Ok(written)
    }
}
