// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::traits::{EngineError, FetchedPage, PageFetcher};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// 抓取引擎
///
/// 基于reqwest实现的基本HTTP抓取引擎。同一会话内的翻页请求
/// 复用同一个客户端，使cookie跨页保持。
pub struct ReqwestEngine {
    client: reqwest::Client,
}

impl ReqwestEngine {
    /// 创建新的抓取引擎实例
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .cookie_store(true)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for ReqwestEngine {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, EngineError> {
        let response = self
            .client
            .get(url.clone())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await?;

        let status = response.status();
        let final_url = response.url().clone();

        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        let html = response.text().await?;
        debug!(url = %final_url, bytes = html.len(), "Result page fetched");

        Ok(FetchedPage {
            final_url,
            html,
            status_code: status.as_u16(),
        })
    }

    fn name(&self) -> &'static str {
        "reqwest"
    }
}
