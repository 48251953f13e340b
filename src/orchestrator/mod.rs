//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! App (遍历 区域 × 语言)
//!     ↓
//! workflow::SectionFlow (处理单个分区)
//!     ↓
//! services (能力层：dedup / history / journal / index)
//!     ↓
//! infrastructure (基础设施：Extractor)
//! ```

pub mod app;

pub use app::{App, RunStats};
