//! 分区标题、语言区域变体与列表页引用

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use url::form_urlencoded;

/// 一个语言区域变体，对应一个独立的日志目录（scope）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleVariant {
    /// 名称，仅用于日志
    pub name: String,
    /// 追加到列表页的 `spoken_language_code` 参数
    #[serde(default)]
    pub spoken_language_code: Option<String>,
    /// 日志目录
    pub journal_dir: String,
    /// 标题后缀，用来在共享文档中区分不同区域
    #[serde(default)]
    pub heading_suffix: Option<String>,
}

impl LocaleVariant {
    pub fn default_locale() -> Self {
        Self {
            name: "default".to_string(),
            spoken_language_code: None,
            journal_dir: "daily".to_string(),
            heading_suffix: None,
        }
    }

    pub fn chinese() -> Self {
        Self {
            name: "zh".to_string(),
            spoken_language_code: Some("zh".to_string()),
            journal_dir: "daily_zh".to_string(),
            heading_suffix: Some("zh".to_string()),
        }
    }

    /// 该区域下某个语言的分区
    pub fn section(&self, language: &str) -> Section {
        Section::new(language, self.heading_suffix.clone())
    }

    pub fn page_ref(&self, language: &str) -> PageRef {
        PageRef {
            language: language.to_string(),
            spoken_language_code: self.spoken_language_code.clone(),
        }
    }
}

/// 分区：日志文件与索引文档共用的锚点
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Section {
    pub language: String,
    pub suffix: Option<String>,
}

impl Section {
    pub fn new(language: impl Into<String>, suffix: Option<String>) -> Self {
        Self {
            language: language.into(),
            suffix: suffix.filter(|s| !s.is_empty()),
        }
    }

    /// 渲染标题行，例如 `## Python`、`## All language`、`## Go (zh)`
    pub fn heading(&self) -> String {
        let base = if self.language.is_empty() {
            "## All language".to_string()
        } else {
            format!("## {}", capitalize(&self.language))
        };
        match &self.suffix {
            Some(suffix) => format!("{} ({})", base, suffix),
            None => base,
        }
    }

    /// 日志中显示的语言名
    pub fn label(&self) -> &str {
        if self.language.is_empty() {
            "all"
        } else {
            &self.language
        }
    }
}

impl Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.suffix {
            Some(suffix) => write!(f, "[{}|{}]", self.label(), suffix),
            None => write!(f, "[{}]", self.label()),
        }
    }
}

/// 首字母大写，其余小写
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// 一个趋势列表页
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub language: String,
    pub spoken_language_code: Option<String>,
}

impl PageRef {
    /// 拼出列表页地址；语言路径段按 `quote_plus` 规则编码
    pub fn url(&self, trending_base_url: &str) -> String {
        let base = trending_base_url.trim_end_matches('/');
        let mut url = if self.language.is_empty() {
            base.to_string()
        } else {
            let segment: String = form_urlencoded::byte_serialize(self.language.as_bytes()).collect();
            format!("{}/{}", base, segment)
        };
        if let Some(code) = &self.spoken_language_code {
            url.push_str("?spoken_language_code=");
            url.extend(form_urlencoded::byte_serialize(code.as_bytes()));
        }
        url
    }
}

impl Display for PageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let lang = if self.language.is_empty() { "all" } else { self.language.as_str() };
        match &self.spoken_language_code {
            Some(code) => write!(f, "{}?{}", lang, code),
            None => write!(f, "{}", lang),
        }
    }
}
