//! 趋势列表抽取器 - 基础设施层
//!
//! 唯一接触网络的模块。对外只暴露 `fetch` 能力，任何失败都收敛为空列表。

use crate::config::Config;
use crate::error::{ConfigError, FetchError};
use crate::models::{PageRef, RawRecord};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::StatusCode;
use scraper::{Html, Selector};
use tracing::{debug, info, warn};
use url::Url;

/// 列表页抽取能力
///
/// 返回的记录保持页面顺序；网络错误、非 200 响应都返回空列表，不返回错误。
#[async_trait]
pub trait Extractor: Send + Sync {
    async fn fetch(&self, page: &PageRef) -> Vec<RawRecord>;
}

/// GitHub 趋势页抽取器
pub struct TrendingExtractor {
    client: reqwest::Client,
    trending_base_url: String,
    site_base: Url,
}

impl TrendingExtractor {
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        let mut headers = HeaderMap::new();
        for (name, value) in &config.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ConfigError::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .default_headers(headers)
            .build()
            .map_err(ConfigError::ClientBuildFailed)?;

        let site_base = Url::parse(&config.site_base_url).map_err(|_| ConfigError::InvalidUrl {
            field: "site_base_url".to_string(),
            value: config.site_base_url.clone(),
        })?;

        Ok(Self {
            client,
            trending_base_url: config.trending_base_url.clone(),
            site_base,
        })
    }

    async fn fetch_html(&self, url: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::RequestFailed {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FetchError::BadStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::RequestFailed {
            url: url.to_string(),
            source,
        })
    }
}

#[async_trait]
impl Extractor for TrendingExtractor {
    async fn fetch(&self, page: &PageRef) -> Vec<RawRecord> {
        let url = page.url(&self.trending_base_url);
        info!("🕸️ 正在抓取: {}", url);

        match self.fetch_html(&url).await {
            Ok(html) => {
                let records = parse_trending_html(&html, &self.site_base);
                debug!("{} 解析出 {} 条记录", url, records.len());
                records
            }
            Err(e) => {
                warn!("⚠️ 抓取失败: {}", e);
                Vec::new()
            }
        }
    }
}

/// 从趋势页 HTML 中抽取记录
///
/// - 行：`div.Box article.Box-row`
/// - 标题与链接：`.lh-condensed a`
/// - 描述：`p.col-9`
///
/// 没有链接的行直接丢弃；链接按 `site_base` 解析成绝对地址。
pub fn parse_trending_html(html: &str, site_base: &Url) -> Vec<RawRecord> {
    let (Ok(row_sel), Ok(link_sel), Ok(desc_sel)) = (
        Selector::parse("div.Box article.Box-row"),
        Selector::parse(".lh-condensed a"),
        Selector::parse("p.col-9"),
    ) else {
        return Vec::new();
    };

    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for row in document.select(&row_sel) {
        let Some(link) = row.select(&link_sel).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href").map(str::trim).filter(|h| !h.is_empty()) else {
            continue;
        };
        let Ok(url) = site_base.join(href) else {
            debug!("无法解析链接: {}", href);
            continue;
        };

        let title = link.text().collect::<Vec<_>>().join(" ");
        let description = row
            .select(&desc_sel)
            .next()
            .map(|p| p.text().collect::<Vec<_>>().join(" "))
            .unwrap_or_default();

        records.push(RawRecord::new(
            title.split_whitespace().collect::<Vec<_>>().join(" "),
            url.to_string(),
            description.split_whitespace().collect::<Vec<_>>().join(" "),
        ));
    }

    records
}
