// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

/// 引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 非成功状态码
    #[error("HTTP status {0}")]
    HttpStatus(u16),
    /// 其他错误
    #[error("Other error: {0}")]
    Other(String),
}

/// 抓取到的结果页
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// 实际响应的URL（重定向之后），翻页链接以它为基准解析
    pub final_url: Url,
    /// 页面HTML
    pub html: String,
    /// HTTP状态码
    pub status_code: u16,
}

/// 结果页抓取器特质
///
/// 抓取是抓取周期中仅有的两个挂起点之一；调用方通过丢弃
/// 未完成的 future 来中止进行中的请求
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// 抓取一张结果页；非成功状态码视为错误
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, EngineError>;

    /// 获取引擎名称
    fn name(&self) -> &'static str;
}
