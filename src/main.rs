// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use anyhow::Context;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tracing::{info, warn};
use url::Url;

use grabrs::application::commands::{ControlCommand, StartParams};
use grabrs::application::controller::SessionController;
use grabrs::application::export::DomainExporter;
use grabrs::config::settings::Settings;
use grabrs::domain::models::events::SessionEvent;
use grabrs::engines::reqwest_engine::ReqwestEngine;
use grabrs::infrastructure::scan::scanner::ResultPageScanner;
use grabrs::infrastructure::storage::create_storage_repository;
use grabrs::utils::telemetry;

/// 主函数
///
/// 应用程序入口点：装配组件，发出启动命令，跟踪会话事件，
/// 会话终止后导出累计结果。Ctrl-C 触发停止命令。
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting grabrs...");

    // 2. Load configuration
    let settings = Settings::new().context("Failed to load configuration")?;
    info!("Configuration loaded");

    // 3. Wire components
    let storage = create_storage_repository(&settings.storage)?;
    let fetcher = Arc::new(ReqwestEngine::new(
        &settings.fetcher.user_agent,
        Duration::from_secs(settings.fetcher.timeout_secs),
    )?);
    let scanner = Arc::new(ResultPageScanner::from_settings(&settings.scan)?);
    let exporter = DomainExporter::new(Arc::clone(&storage), settings.export.prefix.clone());

    let (events_tx, mut events_rx) = broadcast::channel::<SessionEvent>(64);
    let (command_tx, command_rx) = mpsc::channel::<ControlCommand>(16);

    let controller = SessionController::new(storage, fetcher, scanner, exporter, events_tx);
    let controller_handle = tokio::spawn(controller.run(command_rx));

    // 4. Kick off a session from the configured parameters
    let start_url = resolve_start_url(&settings)?;
    command_tx
        .send(ControlCommand::Start(StartParams {
            start_url,
            max_pages: settings.session.max_pages,
            pause_ms: settings.session.pause_ms,
        }))
        .await
        .context("Controller command channel closed")?;

    // 5. Follow the session until it reaches a terminal state
    loop {
        tokio::select! {
            event = events_rx.recv() => match event {
                Ok(SessionEvent::Progress { current_page, max_pages, domains_count }) => {
                    info!(current_page, max_pages, domains_count, "Progress");
                }
                Ok(SessionEvent::Completed { domains_count, current_page, reason }) => {
                    info!(domains_count, current_page, reason = %reason, "Extraction finished");
                    break;
                }
                Ok(SessionEvent::Error { message, domains_count, current_page }) => {
                    warn!(domains_count, current_page, message = %message, "Extraction ended");
                    break;
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // 错过的通知可以从持久状态重建，跳过即可
                    warn!(skipped, "Notification receiver lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Ctrl-C received, stopping extraction");
                command_tx.send(ControlCommand::Stop).await.ok();
            }
        }
    }

    // 6. Export whatever was collected, then shut down
    command_tx.send(ControlCommand::RequestDownload).await.ok();
    drop(command_tx);
    controller_handle
        .await
        .context("Controller task panicked")?;
    Ok(())
}

/// 确定第一张结果页：优先显式URL，其次由搜索词构造
fn resolve_start_url(settings: &Settings) -> anyhow::Result<Url> {
    if let Some(raw) = &settings.session.start_url {
        return Url::parse(raw).context("Invalid session.start_url");
    }
    if let Some(query) = &settings.session.query {
        let raw = format!(
            "https://www.google.com/search?q={}",
            urlencoding::encode(query)
        );
        return Ok(Url::parse(&raw)?);
    }
    anyhow::bail!("Either session.start_url or session.query must be configured")
}
