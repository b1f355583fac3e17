// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::time::Duration;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use grabrs::engines::reqwest_engine::ReqwestEngine;
use grabrs::engines::traits::{EngineError, PageFetcher};

fn engine() -> ReqwestEngine {
    ReqwestEngine::new("grabrs-test/1.0", Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn fetches_a_result_page() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<html><body><div id=\"search\"></div></body></html>"),
        )
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/search", server.uri())).unwrap();
    let page = engine().fetch(&url).await.unwrap();

    assert_eq!(page.status_code, 200);
    assert!(page.html.contains("search"));
    assert_eq!(page.final_url.path(), "/search");
}

#[tokio::test]
async fn non_success_status_is_a_transport_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blocked"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let url = Url::parse(&format!("{}/blocked", server.uri())).unwrap();
    let err = engine().fetch(&url).await.unwrap_err();

    assert!(matches!(err, EngineError::HttpStatus(429)));
}

#[tokio::test]
async fn connection_failure_is_a_transport_failure() {
    // 没有监听者的端口
    let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();
    let err = engine().fetch(&url).await.unwrap_err();
    assert!(matches!(err, EngineError::RequestFailed(_)));
}
