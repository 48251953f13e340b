//! 分区处理上下文
//!
//! 封装"我正在把哪些列表页写进哪个目录的哪个分区"这一信息

use crate::models::{PageRef, Section};
use chrono::NaiveDate;
use std::fmt::Display;
use std::path::PathBuf;

/// 分区处理上下文
#[derive(Debug, Clone)]
pub struct SectionCtx {
    /// 日志目录
    pub scope_dir: PathBuf,

    /// 目标分区
    pub section: Section,

    /// 数据来源，按优先级排列（靠前的来源在去重时胜出）
    pub sources: Vec<PageRef>,

    /// 观测日期
    pub date: NaiveDate,
}

impl SectionCtx {
    pub fn new(
        scope_dir: impl Into<PathBuf>,
        section: Section,
        sources: Vec<PageRef>,
        date: NaiveDate,
    ) -> Self {
        Self {
            scope_dir: scope_dir.into(),
            section,
            sources,
            date,
        }
    }
}

impl Display for SectionCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[目录 {} 分区 {} 来源 {}]",
            self.scope_dir.display(),
            self.section.heading().trim_start_matches("## "),
            self.sources.len()
        )
    }
}
