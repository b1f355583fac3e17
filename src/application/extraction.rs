// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::application::commands::StartParams;
use crate::domain::models::events::SessionEvent;
use crate::domain::models::scan_outcome::ScanOutcome;
use crate::domain::models::session_state::SessionState;
use crate::engines::traits::PageFetcher;
use crate::infrastructure::accumulator::DomainAccumulator;
use crate::infrastructure::scan::scanner::ResultPageScanner;
use crate::infrastructure::session_store::SessionStore;
use crate::utils::errors::SessionError;

/// 用户停止时的终止消息；观察者靠它与失败区分
pub const STOPPED_MESSAGE: &str = "Stopped by user";

/// 正常完成的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionReason {
    /// 达到页数上限；与翻页耗尽同时成立时以此为准
    MaxPagesReached,
    /// 结果页到头（没有翻页链接）
    NoMorePages,
}

impl CompletionReason {
    pub fn message(self) -> &'static str {
        match self {
            Self::MaxPagesReached => "Max pages reached",
            Self::NoMorePages => "No more pages (End of results)",
        }
    }
}

/// 会话终止方式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEnd {
    /// 正常终止
    Completed { reason: CompletionReason },
    /// 用户取消
    Stopped,
    /// 页面传输失败或存储失败
    Errored { message: String },
}

/// 抓取状态机
///
/// 串行驱动 取页→扫描→合并→推进 周期。两个持久值
/// （会话状态、累计结果）只由它写入；周期内的所有持久化
/// 写入都先于终止判定完成，已收集的结果在任何终止路径上
/// 都不会丢失。
///
/// 周期内仅有两个挂起点：取页和翻页停顿；取消在这两处
/// 立即生效，已抓取页面的合并与落盘不会被打断。
pub struct ExtractionSession {
    fetcher: Arc<dyn PageFetcher>,
    scanner: Arc<ResultPageScanner>,
    accumulator: DomainAccumulator,
    session_store: SessionStore,
    events: broadcast::Sender<SessionEvent>,
    stop_rx: watch::Receiver<bool>,
    rng: StdRng,
    session_id: Uuid,
}

impl ExtractionSession {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        scanner: Arc<ResultPageScanner>,
        accumulator: DomainAccumulator,
        session_store: SessionStore,
        events: broadcast::Sender<SessionEvent>,
        stop_rx: watch::Receiver<bool>,
    ) -> Self {
        Self::with_rng(
            fetcher,
            scanner,
            accumulator,
            session_store,
            events,
            stop_rx,
            StdRng::from_os_rng(),
        )
    }

    /// 注入随机源的构造方式，让翻页停顿在测试下可复现
    #[allow(clippy::too_many_arguments)]
    pub fn with_rng(
        fetcher: Arc<dyn PageFetcher>,
        scanner: Arc<ResultPageScanner>,
        accumulator: DomainAccumulator,
        session_store: SessionStore,
        events: broadcast::Sender<SessionEvent>,
        stop_rx: watch::Receiver<bool>,
        rng: StdRng,
    ) -> Self {
        Self {
            fetcher,
            scanner,
            accumulator,
            session_store,
            events,
            stop_rx,
            rng,
            session_id: Uuid::new_v4(),
        }
    }

    /// 运行一次完整会话直到终止
    pub async fn run(mut self, params: StartParams) -> SessionEnd {
        info!(
            session_id = %self.session_id,
            start_url = %params.start_url,
            max_pages = params.max_pages,
            pause_ms = params.pause_ms,
            "Extraction session started"
        );

        let mut state = SessionState::started(params.max_pages, params.pause_ms);

        // 启动即清空累计结果并落盘初始状态
        if let Err(e) = self.reset(&state).await {
            return self.finish_errored(state, e.to_string()).await;
        }

        let mut stop_rx = self.stop_rx.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let mut page_url = params.start_url;

        loop {
            // 取页：挂起点，可取消；此刻本页尚未产生任何数据
            let fetched = tokio::select! {
                res = fetcher.fetch(&page_url) => res,
                _ = wait_for_stop(&mut stop_rx) => {
                    return self.finish_stopped(state).await;
                }
            };

            let page = match fetched {
                Ok(page) => page,
                Err(e) => return self.finish_errored(state, e.to_string()).await,
            };

            let ScanOutcome {
                hostnames,
                next_page,
            } = self.scanner.scan(&page.html, &page.final_url);
            let new_hosts = hostnames.len();

            // 本周期的所有持久写入先于任何终止判定
            let merged = match self.accumulator.absorb(hostnames).await {
                Ok(merged) => merged,
                Err(e) => return self.finish_errored(state, e.to_string()).await,
            };

            state.current_page += 1;
            state.domains_count = merged.len();
            if let Err(e) = self.session_store.save(&state).await {
                return self.finish_errored(state, e.to_string()).await;
            }

            info!(
                session_id = %self.session_id,
                page = state.current_page,
                new_hosts,
                total = state.domains_count,
                "Page cycle completed"
            );
            self.emit(SessionEvent::Progress {
                current_page: state.current_page,
                max_pages: state.max_pages,
                domains_count: state.domains_count,
            });

            // 页数上限判定先于翻页链接判定
            if state.current_page >= state.max_pages {
                return self
                    .finish_completed(state, CompletionReason::MaxPagesReached)
                    .await;
            }
            let Some(next) = next_page else {
                return self
                    .finish_completed(state, CompletionReason::NoMorePages)
                    .await;
            };

            // 翻页停顿：挂起点，可取消
            let delay = jittered_delay(state.pause_ms, &mut self.rng);
            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = wait_for_stop(&mut stop_rx) => {
                    return self.finish_stopped(state).await;
                }
            }

            page_url = next;
        }
    }

    async fn reset(&self, state: &SessionState) -> Result<(), SessionError> {
        self.accumulator.replace(&[]).await?;
        self.session_store.save(state).await?;
        Ok(())
    }

    async fn finish_completed(
        &mut self,
        state: SessionState,
        reason: CompletionReason,
    ) -> SessionEnd {
        let state = state.deactivated();
        self.persist_terminal(&state).await;
        info!(
            session_id = %self.session_id,
            pages = state.current_page,
            domains = state.domains_count,
            reason = reason.message(),
            "Extraction session completed"
        );
        self.emit(SessionEvent::Completed {
            domains_count: state.domains_count,
            current_page: state.current_page,
            reason: reason.message().to_string(),
        });
        SessionEnd::Completed { reason }
    }

    async fn finish_stopped(&mut self, state: SessionState) -> SessionEnd {
        let state = state.deactivated();
        self.persist_terminal(&state).await;
        info!(
            session_id = %self.session_id,
            pages = state.current_page,
            domains = state.domains_count,
            "Extraction session stopped by user"
        );
        self.emit(SessionEvent::Error {
            message: STOPPED_MESSAGE.to_string(),
            domains_count: state.domains_count,
            current_page: state.current_page,
        });
        SessionEnd::Stopped
    }

    async fn finish_errored(&mut self, state: SessionState, message: String) -> SessionEnd {
        let state = state.deactivated();
        self.persist_terminal(&state).await;
        warn!(
            session_id = %self.session_id,
            pages = state.current_page,
            domains = state.domains_count,
            error = %message,
            "Extraction session failed"
        );
        self.emit(SessionEvent::Error {
            message: message.clone(),
            domains_count: state.domains_count,
            current_page: state.current_page,
        });
        SessionEnd::Errored { message }
    }

    async fn persist_terminal(&self, state: &SessionState) {
        // 终止路径上的落盘失败只记录，不再改变终止结果
        if let Err(e) = self.session_store.save(state).await {
            error!(
                session_id = %self.session_id,
                error = %e,
                "Failed to persist terminal session state"
            );
        }
    }

    fn emit(&self, event: SessionEvent) {
        // 尽力投递；没有订阅者不是错误
        let _ = self.events.send(event);
    }
}

/// 等待外部停止信号置位
async fn wait_for_stop(rx: &mut watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            // 发送端已关闭且信号从未置位：不会再有停止请求
            std::future::pending::<()>().await;
        }
    }
}

/// 翻页停顿：在 [base, base*1.3) 上均匀取值
///
/// 随机化只为打散完全周期性的请求节奏
pub fn jittered_delay(base_ms: u64, rng: &mut impl Rng) -> Duration {
    let spread = base_ms * 3 / 10;
    let extra = if spread == 0 {
        0
    } else {
        rng.random_range(0..spread)
    };
    Duration::from_millis(base_ms + extra)
}
