use std::path::PathBuf;
use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 日志文件写入错误
    #[error("日志错误: {0}")]
    Journal(#[from] JournalError),
    /// 索引文档错误
    #[error("索引错误: {0}")]
    Index(#[from] IndexError),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML 解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 请求头无效
    #[error("请求头无效: {name}")]
    InvalidHeader { name: String },
    /// 地址无效
    #[error("{field} 不是有效的地址: {value}")]
    InvalidUrl { field: String, value: String },
    /// HTTP 客户端创建失败
    #[error("HTTP客户端创建失败: {0}")]
    ClientBuildFailed(#[source] reqwest::Error),
    /// 所有日志目录都无法创建
    #[error("所有日志目录都无法初始化: {dirs:?}")]
    NoUsableScope { dirs: Vec<String> },
}

/// 日志文件错误
#[derive(Debug, Error)]
pub enum JournalError {
    /// 创建目录失败
    #[error("创建目录失败 ({path}): {source}")]
    CreateDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 身份记录序列化失败
    #[error("身份记录序列化失败: {0}")]
    LedgerEncodeFailed(#[from] serde_json::Error),
}

/// 索引文档错误
#[derive(Debug, Error)]
pub enum IndexError {
    /// 读取索引失败
    #[error("读取索引失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// 写入索引失败
    #[error("写入索引失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// 抓取错误（只在抽取器内部出现，不会越过抽取器边界）
#[derive(Debug, Error)]
pub enum FetchError {
    /// 网络请求失败
    #[error("请求失败 ({url}): {source}")]
    RequestFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// 非 200 响应
    #[error("请求返回状态码 {status} ({url})")]
    BadStatus { url: String, status: u16 },
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
