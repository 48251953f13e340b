//! # Trending Journal
//!
//! 定时抓取 GitHub 趋势仓库列表，按天写入去重后的 markdown 日志，
//! 并可选维护一个按分区组织的滚动索引文档。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 唯一接触网络的部分，只暴露 `fetch` 能力
//! - `TrendingExtractor` - 抓取并解析趋势页，失败时返回空列表
//!
//! ### ② 业务能力层（Services）
//! - `Deduplicator` - 合并多个批次，先出现者胜出
//! - `HistoryIndex` - 从日志目录重建已写入的身份键集合
//! - `JournalWriter` - 过滤历史后追加到当天分片
//! - `IndexMerger` - 把新记录并入滚动索引
//! - `IdentityLedger` - 可选的身份记录文件
//!
//! ### ③ 流程层（Workflow）
//! - `SectionFlow` - 一个分区的完整流程（抓取 → 去重 → 写日志 → 写索引）
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 顺序遍历 区域 × 语言，单个分区失败不影响其他分区
//!
//! ## 模块结构
//!
//! - `config` / `error` - 配置加载与错误类型
//! - `models` - 记录、分区、列表页引用
//! - `utils` - 日志初始化与统计输出

pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, HistoryScope};
pub use error::{AppError, AppResult};
pub use infrastructure::{Extractor, TrendingExtractor};
pub use models::{IdentityKey, LocaleVariant, PageRef, RawRecord, Record, Section};
pub use orchestrator::{App, RunStats};
pub use workflow::{SectionCtx, SectionFlow, SectionOutcome};
