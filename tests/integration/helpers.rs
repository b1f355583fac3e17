// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use url::Url;

use grabrs::application::commands::StartParams;
use grabrs::application::extraction::{ExtractionSession, SessionEnd};
use grabrs::config::settings::ScanSettings;
use grabrs::domain::models::events::SessionEvent;
use grabrs::domain::repositories::storage_repository::StorageRepository;
use grabrs::engines::traits::{EngineError, FetchedPage, PageFetcher};
use grabrs::infrastructure::accumulator::DomainAccumulator;
use grabrs::infrastructure::scan::scanner::ResultPageScanner;
use grabrs::infrastructure::session_store::SessionStore;

/// 以预置页面应答的抓取器
pub struct MockFetcher {
    pages: HashMap<String, Result<String, u16>>,
    fetch_count: AtomicUsize,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            fetch_count: AtomicUsize::new(0),
        }
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(html.to_string()));
        self
    }

    pub fn with_failure(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PageFetcher for MockFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, EngineError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);
        match self.pages.get(url.as_str()) {
            Some(Ok(html)) => Ok(FetchedPage {
                final_url: url.clone(),
                html: html.clone(),
                status_code: 200,
            }),
            Some(Err(status)) => Err(EngineError::HttpStatus(*status)),
            None => Err(EngineError::Other(format!("unexpected url: {}", url))),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// 构造一张带结果锚点的搜索页；`next` 为翻页链接
pub fn result_page(hosts: &[&str], next: Option<&str>) -> String {
    let anchors: String = hosts
        .iter()
        .map(|host| {
            format!(
                r#"<div class="g"><a href="https://{}/landing">result</a></div>"#,
                host
            )
        })
        .collect();
    let next_anchor = next
        .map(|url| format!(r#"<a id="pnnext" href="{}">Next</a>"#, url))
        .unwrap_or_default();
    format!(
        r#"<html><body><div id="search">{}</div>{}</body></html>"#,
        anchors, next_anchor
    )
}

pub fn default_scanner() -> Arc<ResultPageScanner> {
    Arc::new(ResultPageScanner::from_settings(&ScanSettings::default()).unwrap())
}

pub fn start_params(max_pages: u32, pause_ms: u64) -> StartParams {
    StartParams {
        start_url: Url::parse("https://search.test/p1").unwrap(),
        max_pages,
        pause_ms,
    }
}

/// 跑完一整个会话，收集终止方式和发出的事件
pub async fn run_session(
    storage: Arc<dyn StorageRepository>,
    fetcher: Arc<dyn PageFetcher>,
    max_pages: u32,
    pause_ms: u64,
) -> (SessionEnd, Vec<SessionEvent>) {
    let (events_tx, mut events_rx) = broadcast::channel(64);
    let (_stop_tx, stop_rx) = watch::channel(false);

    let session = ExtractionSession::new(
        fetcher,
        default_scanner(),
        DomainAccumulator::new(Arc::clone(&storage)),
        SessionStore::new(Arc::clone(&storage)),
        events_tx,
        stop_rx,
    );
    let end = session.run(start_params(max_pages, pause_ms)).await;

    let mut events = Vec::new();
    while let Ok(event) = events_rx.try_recv() {
        events.push(event);
    }
    (end, events)
}
