//! 分区处理流程 - 流程层
//!
//! 核心职责：定义"一个分区"的完整处理流程
//!
//! 流程顺序：
//! 1. 逐个来源抓取
//! 2. 合并去重（靠前来源优先）
//! 3. 过滤历史并追加到当天分片
//! 4. 把实际写入的记录并入滚动索引（如果配置了）

use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::Extractor;
use crate::models::{PageRef, Record};
use crate::services::{Deduplicator, IndexMerger, JournalWriter};
use crate::workflow::section_ctx::SectionCtx;

/// 分区处理结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOutcome {
    /// 所有来源抓取到的记录总数
    pub fetched: usize,
    /// 合并去重后的条数
    pub unique: usize,
    /// 写入日志的条数
    pub written: usize,
    /// 并入索引的条数
    pub indexed: usize,
    /// 没有返回任何记录的来源
    pub empty_sources: Vec<PageRef>,
}

/// 分区处理流程
///
/// - 不持有抽取器，只借用
/// - 只依赖业务能力（services）
pub struct SectionFlow<'a> {
    extractor: &'a dyn Extractor,
    dedup: Deduplicator,
    journal: JournalWriter,
    index: Option<IndexMerger>,
}

impl<'a> SectionFlow<'a> {
    pub fn new(config: &Config, extractor: &'a dyn Extractor) -> Self {
        Self {
            extractor,
            dedup: Deduplicator::new(),
            journal: JournalWriter::from_config(config),
            index: config.index_path.as_ref().map(IndexMerger::new),
        }
    }

    pub async fn run(&self, ctx: &SectionCtx) -> SectionOutcome {
        let mut outcome = SectionOutcome::default();

        // ========== 1. 抓取 ==========
        let mut batches = Vec::with_capacity(ctx.sources.len());
        for source in &ctx.sources {
            let raw = self.extractor.fetch(source).await;
            if raw.is_empty() {
                warn!("{} ⚠️ {} 没有抓到任何记录", ctx, source);
                outcome.empty_sources.push(source.clone());
                continue;
            }
            outcome.fetched += raw.len();
            batches.push(
                raw.iter()
                    .map(|r| Record::observe(r, ctx.date))
                    .collect::<Vec<_>>(),
            );
        }

        // ========== 2. 合并去重 ==========
        let merged = self.dedup.merge(&batches);
        outcome.unique = merged.len();
        if merged.is_empty() {
            return outcome;
        }
        if merged.len() < outcome.fetched {
            info!(
                "{} 合并去重: {} → {}",
                ctx,
                outcome.fetched,
                merged.len()
            );
        }

        // ========== 3. 写入日志 ==========
        let written = self
            .journal
            .append_records(&ctx.scope_dir, &ctx.section, &merged, ctx.date);
        outcome.written = written.len();

        // ========== 4. 并入索引 ==========
        if let Some(index) = &self.index {
            outcome.indexed = index.merge_file(&ctx.section.heading(), &written);
        }

        outcome
    }
}
