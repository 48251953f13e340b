//! 趋势日志主流程 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责遍历"区域 × 语言"并汇总结果。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：创建抽取器、准备各区域日志目录
//! 2. **顺序处理**：一个 (语言, 区域) 处理完再开始下一个
//! 3. **故障隔离**：单个分区失败不影响其他分区
//! 4. **全局统计**：汇总抓取和写入数量

use crate::config::Config;
use crate::error::ConfigError;
use crate::infrastructure::{Extractor, TrendingExtractor};
use crate::models::{LocaleVariant, Section};
use crate::utils::logging;
use crate::workflow::{SectionCtx, SectionFlow, SectionOutcome};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;
use tracing::{error, info};

/// 应用主结构
pub struct App {
    config: Config,
    extractor: Box<dyn Extractor>,
    /// 成功初始化的区域
    locales: Vec<LocaleVariant>,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        let extractor = TrendingExtractor::new(&config).context("无法创建抽取器")?;
        Self::with_extractor(config, Box::new(extractor))
    }

    /// 使用自定义抽取器初始化
    ///
    /// 无法创建的日志目录会被跳过；所有目录都失败时返回错误。
    pub fn with_extractor(config: Config, extractor: Box<dyn Extractor>) -> Result<Self> {
        logging::log_startup(&config);

        let mut locales = Vec::new();
        let mut failed = Vec::new();
        for locale in &config.locales {
            match fs::create_dir_all(&locale.journal_dir) {
                Ok(()) => locales.push(locale.clone()),
                Err(e) => {
                    error!(
                        "❌ 无法创建日志目录 {} ({}): {}",
                        locale.journal_dir, locale.name, e
                    );
                    failed.push(locale.journal_dir.clone());
                }
            }
        }

        if locales.is_empty() {
            return Err(ConfigError::NoUsableScope { dirs: failed }.into());
        }

        Ok(Self {
            config,
            extractor,
            locales,
        })
    }

    /// 以今天的本地日期运行
    pub async fn run(&self) -> RunStats {
        self.run_on(chrono::Local::now().date_naive()).await
    }

    /// 以指定日期运行
    pub async fn run_on(&self, date: NaiveDate) -> RunStats {
        let flow = SectionFlow::new(&self.config, self.extractor.as_ref());
        let plan = self.plan(date);
        let mut stats = RunStats::default();

        info!("📅 观测日期: {} | 共 {} 个分区", date, plan.len());

        for (idx, ctx) in plan.iter().enumerate() {
            info!("📦 [{}/{}] {}", idx + 1, plan.len(), ctx);
            let outcome = flow.run(ctx).await;
            stats.record(ctx, &outcome);
        }

        logging::print_final_stats(&stats);
        stats
    }

    /// 生成本次运行的分区列表
    ///
    /// 默认每个 (区域, 语言) 一个分区，区域在外层循环；
    /// `combine_locales` 时每个语言一个分区，写入第一个区域的目录。
    pub fn plan(&self, date: NaiveDate) -> Vec<SectionCtx> {
        if self.config.combine_locales {
            let Some(primary) = self.locales.first() else {
                return Vec::new();
            };
            return self
                .config
                .languages
                .iter()
                .map(|lang| {
                    SectionCtx::new(
                        PathBuf::from(&primary.journal_dir),
                        Section::new(lang.as_str(), None),
                        self.locales.iter().map(|l| l.page_ref(lang)).collect(),
                        date,
                    )
                })
                .collect();
        }

        self.locales
            .iter()
            .flat_map(|locale| {
                self.config.languages.iter().map(move |lang| {
                    SectionCtx::new(
                        PathBuf::from(&locale.journal_dir),
                        locale.section(lang),
                        vec![locale.page_ref(lang)],
                        date,
                    )
                })
            })
            .collect()
    }
}

/// 运行统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub sections: usize,
    pub fetched: usize,
    pub written: usize,
    pub indexed: usize,
    /// 没有抓到记录的来源（用于日志）
    pub empty_sources: Vec<String>,
}

impl RunStats {
    fn record(&mut self, ctx: &SectionCtx, outcome: &SectionOutcome) {
        self.sections += 1;
        self.fetched += outcome.fetched;
        self.written += outcome.written;
        self.indexed += outcome.indexed;
        for source in &outcome.empty_sources {
            self.empty_sources.push(format!("{} → {}", source, ctx.scope_dir.display()));
        }
        if outcome.written == 0 && outcome.unique > 0 {
            info!("{} 没有新记录需要写入", ctx);
        }
    }
}
