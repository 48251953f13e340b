//! 趋势仓库记录

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// 记录的身份键
///
/// 优先使用 url；url 为空时退回到 title。
/// 两种来源的键互不相等，即使字符串内容相同。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKey {
    Url(String),
    Title(String),
}

impl IdentityKey {
    /// 按 url 优先的规则从 (title, url) 推导身份键
    pub fn from_parts(title: &str, url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            IdentityKey::Title(title.trim().to_string())
        } else {
            IdentityKey::Url(url.to_string())
        }
    }
}

impl Display for IdentityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityKey::Url(url) => write!(f, "url:{}", url),
            IdentityKey::Title(title) => write!(f, "title:{}", title),
        }
    }
}

/// 抽取器返回的原始记录（尚未标注观测日期）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawRecord {
    pub title: String,
    pub url: String,
    pub description: String,
}

impl RawRecord {
    pub fn new(
        title: impl Into<String>,
        url: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            description: description.into(),
        }
    }
}

/// 一条趋势仓库记录
///
/// 通过 [`Record::new`] 构造时会规范化字段：
/// - title 的连续空白折叠成单个空格
/// - description 去掉所有控制字符（包括 `\r` `\n`），保证单行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub title: String,
    pub url: String,
    pub description: String,
    pub observed: NaiveDate,
}

impl Record {
    pub fn new(
        title: impl AsRef<str>,
        url: impl AsRef<str>,
        description: impl AsRef<str>,
        observed: NaiveDate,
    ) -> Self {
        Self {
            title: collapse_whitespace(title.as_ref()),
            url: url.as_ref().trim().to_string(),
            description: sanitize_description(description.as_ref()),
            observed,
        }
    }

    /// 给原始记录标注观测日期
    pub fn observe(raw: &RawRecord, observed: NaiveDate) -> Self {
        Self::new(&raw.title, &raw.url, &raw.description, observed)
    }

    pub fn identity(&self) -> IdentityKey {
        IdentityKey::from_parts(&self.title, &self.url)
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 去掉描述中的控制字符并修剪首尾空白
pub fn sanitize_description(desc: &str) -> String {
    desc.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
