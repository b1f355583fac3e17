// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use url::Url;

use grabrs::application::commands::{ControlCommand, StartParams};
use grabrs::application::controller::SessionController;
use grabrs::application::export::DomainExporter;
use grabrs::application::extraction::STOPPED_MESSAGE;
use grabrs::domain::models::events::SessionEvent;
use grabrs::domain::repositories::storage_repository::StorageRepository;
use grabrs::infrastructure::storage::InMemoryStorage;

use crate::helpers::{default_scanner, result_page, MockFetcher};

fn build_controller(
    storage: Arc<dyn StorageRepository>,
    fetcher: Arc<MockFetcher>,
) -> (
    SessionController,
    broadcast::Receiver<SessionEvent>,
    mpsc::Sender<ControlCommand>,
    mpsc::Receiver<ControlCommand>,
) {
    let (events_tx, events_rx) = broadcast::channel(64);
    let (command_tx, command_rx) = mpsc::channel(16);
    let exporter = DomainExporter::new(Arc::clone(&storage), "Google_Grab");
    let controller = SessionController::new(
        storage,
        fetcher,
        default_scanner(),
        exporter,
        events_tx,
    );
    (controller, events_rx, command_tx, command_rx)
}

fn start(url: &str, max_pages: u32, pause_ms: u64) -> ControlCommand {
    ControlCommand::Start(StartParams {
        start_url: Url::parse(url).unwrap(),
        max_pages,
        pause_ms,
    })
}

/// 已有会话在运行时，第二个启动命令被忽略
#[tokio::test]
async fn a_second_start_while_running_is_ignored() {
    let storage: Arc<dyn StorageRepository> = Arc::new(InMemoryStorage::new());
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_page(
                "https://search.test/p1",
                &result_page(&["a.com"], Some("https://search.test/p2")),
            )
            .with_page("https://other.test/p1", &result_page(&["b.com"], None)),
    );

    let (controller, mut events_rx, command_tx, command_rx) =
        build_controller(Arc::clone(&storage), fetcher.clone());
    let controller_handle = tokio::spawn(controller.run(command_rx));

    // 第一个会话停顿拉长，保证第二个启动命令落在它运行期间
    command_tx
        .send(start("https://search.test/p1", 5, 30_000))
        .await
        .unwrap();

    // 等第一页完成
    loop {
        if let SessionEvent::Progress { current_page: 1, .. } = events_rx.recv().await.unwrap() {
            break;
        }
    }

    command_tx
        .send(start("https://other.test/p1", 1, 0))
        .await
        .unwrap();
    command_tx.send(ControlCommand::Stop).await.unwrap();

    // 停止通知到达后，另一个起始URL从未被抓取
    loop {
        if let SessionEvent::Error { message, .. } = events_rx.recv().await.unwrap() {
            assert_eq!(message, STOPPED_MESSAGE);
            break;
        }
    }
    assert_eq!(fetcher.fetch_count(), 1);

    drop(command_tx);
    tokio::time::timeout(Duration::from_secs(5), controller_handle)
        .await
        .unwrap()
        .unwrap();
}

/// 会话终止后可以再次启动；启动把旧结果清零
#[tokio::test]
async fn restart_after_completion_runs_a_fresh_session() {
    let storage: Arc<dyn StorageRepository> = Arc::new(InMemoryStorage::new());
    let fetcher = Arc::new(
        MockFetcher::new()
            .with_page("https://search.test/p1", &result_page(&["first.com"], None))
            .with_page("https://other.test/p1", &result_page(&["second.com"], None)),
    );

    let (controller, mut events_rx, command_tx, command_rx) =
        build_controller(Arc::clone(&storage), fetcher.clone());
    let controller_handle = tokio::spawn(controller.run(command_rx));

    command_tx
        .send(start("https://search.test/p1", 3, 0))
        .await
        .unwrap();
    loop {
        if matches!(
            events_rx.recv().await.unwrap(),
            SessionEvent::Completed { .. }
        ) {
            break;
        }
    }

    // 给上一个会话任务退出留一点余地
    tokio::time::sleep(Duration::from_millis(100)).await;

    command_tx
        .send(start("https://other.test/p1", 3, 0))
        .await
        .unwrap();
    loop {
        if let SessionEvent::Completed { domains_count, .. } = events_rx.recv().await.unwrap() {
            assert_eq!(domains_count, 1);
            break;
        }
    }
    assert_eq!(fetcher.fetch_count(), 2);

    drop(command_tx);
    tokio::time::timeout(Duration::from_secs(5), controller_handle)
        .await
        .unwrap()
        .unwrap();
}

/// 下载命令写出换行拼接的文本文件
#[tokio::test]
async fn download_command_exports_the_accumulated_domains() {
    let storage: Arc<dyn StorageRepository> = Arc::new(InMemoryStorage::new());
    let fetcher = Arc::new(MockFetcher::new().with_page(
        "https://search.test/p1",
        &result_page(&["b.com", "a.com"], None),
    ));

    let (controller, mut events_rx, command_tx, command_rx) =
        build_controller(Arc::clone(&storage), fetcher);
    let controller_handle = tokio::spawn(controller.run(command_rx));

    command_tx
        .send(start("https://search.test/p1", 1, 0))
        .await
        .unwrap();
    loop {
        if matches!(
            events_rx.recv().await.unwrap(),
            SessionEvent::Completed { .. }
        ) {
            break;
        }
    }

    command_tx.send(ControlCommand::RequestDownload).await.unwrap();
    drop(command_tx);
    tokio::time::timeout(Duration::from_secs(5), controller_handle)
        .await
        .unwrap()
        .unwrap();

    // 导出文件与两个持久值并存于同一存储
    let export_key = {
        // 文件名含当下时间戳，这里通过前缀探测
        let mut found = None;
        for candidate in probe_export_keys() {
            if storage.get(&candidate).await.unwrap().is_some() {
                found = Some(candidate);
                break;
            }
        }
        found
    };
    let export_key = export_key.expect("export file not written");
    let bytes = storage.get(&export_key).await.unwrap().unwrap();
    assert_eq!(bytes, b"a.com\nb.com");
}

/// 导出文件名依赖当前时刻；围绕调用时刻前后各探测几秒
fn probe_export_keys() -> Vec<String> {
    let now = chrono::Utc::now();
    (-3..=3)
        .map(|offset| {
            let ts = now + chrono::Duration::seconds(offset);
            format!("Google_Grab_{}.txt", ts.format("%Y-%m-%dT%H-%M-%S"))
        })
        .collect()
}
