// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::application::commands::{ControlCommand, StartParams};
use crate::application::export::DomainExporter;
use crate::application::extraction::ExtractionSession;
use crate::domain::models::events::SessionEvent;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::accumulator::DomainAccumulator;
use crate::infrastructure::scan::scanner::ResultPageScanner;
use crate::infrastructure::session_store::SessionStore;

/// 当前活动会话的控制句柄
struct ActiveSession {
    stop_tx: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

/// 会话控制器
///
/// 消费外部控制命令并维护"全系统同一时刻至多一个活动会话"
/// 的约束。控制器与抓取任务之间只通过停止信号、广播事件和
/// 持久存储交互，没有共享的可变内存状态。
pub struct SessionController {
    storage: Arc<dyn StorageRepository>,
    fetcher: Arc<dyn PageFetcher>,
    scanner: Arc<ResultPageScanner>,
    exporter: DomainExporter,
    events: broadcast::Sender<SessionEvent>,
    active: Option<ActiveSession>,
}

impl SessionController {
    pub fn new(
        storage: Arc<dyn StorageRepository>,
        fetcher: Arc<dyn PageFetcher>,
        scanner: Arc<ResultPageScanner>,
        exporter: DomainExporter,
        events: broadcast::Sender<SessionEvent>,
    ) -> Self {
        Self {
            storage,
            fetcher,
            scanner,
            exporter,
            events,
            active: None,
        }
    }

    /// 订阅会话事件
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// 命令循环；命令通道关闭后停止活动会话并退出
    pub async fn run(mut self, mut commands: mpsc::Receiver<ControlCommand>) {
        while let Some(command) = commands.recv().await {
            match command {
                ControlCommand::Start(params) => self.handle_start(params),
                ControlCommand::Stop => self.handle_stop(),
                ControlCommand::RequestDownload => self.handle_download().await,
            }
        }

        self.handle_stop();
        if let Some(active) = self.active.take() {
            let _ = active.handle.await;
        }
    }

    fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    fn handle_start(&mut self, params: StartParams) {
        if self.is_running() {
            warn!("Extraction already running, ignoring start command");
            return;
        }
        if params.max_pages == 0 {
            warn!("Rejecting start command: max_pages must be >= 1");
            return;
        }

        let (stop_tx, stop_rx) = watch::channel(false);
        let session = ExtractionSession::new(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.scanner),
            DomainAccumulator::new(Arc::clone(&self.storage)),
            SessionStore::new(Arc::clone(&self.storage)),
            self.events.clone(),
            stop_rx,
        );
        let handle = tokio::spawn(async move {
            session.run(params).await;
        });

        self.active = Some(ActiveSession { stop_tx, handle });
    }

    fn handle_stop(&mut self) {
        match self.active.as_ref() {
            Some(active) if !active.handle.is_finished() => {
                info!("Stop requested, signalling active session");
                let _ = active.stop_tx.send(true);
            }
            _ => info!("Stop requested but no extraction is running"),
        }
    }

    async fn handle_download(&self) {
        match self.exporter.export().await {
            Ok(Some(filename)) => {
                info!(filename = %filename, "Accumulated domains exported")
            }
            Ok(None) => warn!("No data to download"),
            Err(e) => warn!(error = %e, "Export failed"),
        }
    }
}
