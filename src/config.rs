//! 程序配置
//!
//! 先读取 TOML 配置文件（不存在时使用默认值），再用环境变量覆盖。

use crate::error::ConfigError;
use crate::models::LocaleVariant;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "trending.toml";

/// 历史范围：去重时参考哪些历史分片
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryScope {
    /// 目录下所有日期的分片
    #[default]
    AllDays,
    /// 只看当天的分片
    TodayOnly,
}

impl std::str::FromStr for HistoryScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all_days" | "all" => Ok(HistoryScope::AllDays),
            "today_only" | "today" => Ok(HistoryScope::TodayOnly),
            other => Err(ConfigError::EnvVarParseFailed {
                var_name: "TRENDING_HISTORY_SCOPE".to_string(),
                value: other.to_string(),
                expected_type: "all_days | today_only".to_string(),
            }),
        }
    }
}

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 要抓取的语言列表，空字符串表示全部语言
    pub languages: Vec<String>,
    /// 语言区域变体，每个对应一个日志目录
    pub locales: Vec<LocaleVariant>,
    /// 趋势列表页地址
    pub trending_base_url: String,
    /// 相对链接的解析基准
    pub site_base_url: String,
    /// 请求超时（秒）
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// 额外请求头
    pub headers: BTreeMap<String, String>,
    /// 滚动索引文档路径，为空则不生成
    pub index_path: Option<String>,
    pub history_scope: HistoryScope,
    /// 是否在日志目录旁维护身份记录文件
    pub identity_ledger: bool,
    /// 是否把同一语言的所有区域合并到一个分区
    pub combine_locales: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        let languages = [
            "", "java", "python", "javascript", "go", "c", "c++", "c#", "html", "css", "unknown",
        ];
        let mut headers = BTreeMap::new();
        headers.insert(
            "Accept".to_string(),
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"
                .to_string(),
        );
        headers.insert("Accept-Language".to_string(), "zh-CN,zh;q=0.8".to_string());

        Self {
            languages: languages.iter().map(|s| s.to_string()).collect(),
            locales: vec![LocaleVariant::default_locale(), LocaleVariant::chinese()],
            trending_base_url: "https://github.com/trending".to_string(),
            site_base_url: "https://github.com".to_string(),
            request_timeout_secs: 30,
            user_agent:
                "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.7; rv:11.0) Gecko/20100101 Firefox/11.0"
                    .to_string(),
            headers,
            index_path: None,
            history_scope: HistoryScope::AllDays,
            identity_ledger: false,
            combine_locales: false,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 读取配置文件并应用环境变量覆盖
    ///
    /// 文件不存在时使用默认值。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = if path.exists() {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
                path: path.to_path_buf(),
                source,
            })?;
            Self::from_toml_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            Self::default()
        };
        config.apply_env()
    }

    /// 从 `TRENDING_CONFIG` 指定的文件（默认 `trending.toml`）加载
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var("TRENDING_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load(path)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置项
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Ok(v) = std::env::var("TRENDING_LANGUAGES") {
            self.languages = v.split(',').map(|s| s.trim().to_string()).collect();
        }
        if let Ok(v) = std::env::var("TRENDING_INDEX_PATH") {
            self.index_path = Some(v).filter(|p| !p.is_empty());
        }
        if let Ok(v) = std::env::var("TRENDING_HISTORY_SCOPE") {
            self.history_scope = v.parse()?;
        }
        if let Ok(v) = std::env::var("TRENDING_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_env("TRENDING_TIMEOUT_SECS", &v, "u64")?;
        }
        if let Ok(v) = std::env::var("VERBOSE_LOGGING") {
            self.verbose_logging = parse_env("VERBOSE_LOGGING", &v, "bool")?;
        }
        Ok(self)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_env<T: std::str::FromStr>(
    var_name: &str,
    value: &str,
    expected_type: &str,
) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
        var_name: var_name.to_string(),
        value: value.to_string(),
        expected_type: expected_type.to_string(),
    })
}
