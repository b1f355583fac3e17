// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use scraper::{Html, Selector};
use std::collections::BTreeSet;
use thiserror::Error;
use tracing::debug;
use url::Url;

use crate::config::settings::ScanSettings;
use crate::domain::models::scan_outcome::ScanOutcome;
use crate::infrastructure::scan::exclusion::ExclusionList;

/// 扫描配置错误
#[derive(Error, Debug)]
pub enum ScanConfigError {
    /// 选择器无法解析
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

/// 结果页扫描器
///
/// 给定一张已获取的结果页，产出候选外部主机名集合与翻页链接。
/// `scan` 是其输入的纯函数：不做任何IO、不访问存储。
/// 选择器规则在构建时解析一次，运行期不再失败。
#[derive(Debug)]
pub struct ResultPageScanner {
    result_selectors: Vec<Selector>,
    next_page_selectors: Vec<Selector>,
    cache_proxy_markers: Vec<String>,
    exclusions: ExclusionList,
}

impl ResultPageScanner {
    /// 从扫描配置构建扫描器
    pub fn from_settings(settings: &ScanSettings) -> Result<Self, ScanConfigError> {
        Self::new(
            &settings.result_selectors,
            &settings.next_page_selectors,
            settings.cache_proxy_markers.clone(),
            ExclusionList::new(&settings.excluded_domains),
        )
    }

    pub fn new(
        result_selectors: &[String],
        next_page_selectors: &[String],
        cache_proxy_markers: Vec<String>,
        exclusions: ExclusionList,
    ) -> Result<Self, ScanConfigError> {
        Ok(Self {
            result_selectors: parse_selectors(result_selectors)?,
            next_page_selectors: parse_selectors(next_page_selectors)?,
            cache_proxy_markers,
            exclusions,
        })
    }

    /// 扫描一张结果页
    ///
    /// 单个坏锚点（畸形URL、空链接）静默跳过，绝不中断整页扫描。
    pub fn scan(&self, html: &str, base_url: &Url) -> ScanOutcome {
        let document = Html::parse_document(html);

        let mut hostnames = BTreeSet::new();
        for selector in &self.result_selectors {
            for anchor in document.select(selector) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                if href.is_empty() || self.is_cache_proxy(href) {
                    continue;
                }
                let Ok(target) = base_url.join(href) else {
                    continue;
                };
                if !matches!(target.scheme(), "http" | "https") {
                    continue;
                }
                let Some(host) = target.host_str() else {
                    continue;
                };
                let host = host.to_ascii_lowercase();
                if host.is_empty() || self.exclusions.is_excluded(&host) {
                    continue;
                }
                hostnames.insert(host);
            }
        }

        let next_page = self.locate_next_page(&document, base_url);
        debug!(
            hosts = hostnames.len(),
            has_next = next_page.is_some(),
            "Result page scanned"
        );

        ScanOutcome {
            hostnames,
            next_page,
        }
    }

    fn is_cache_proxy(&self, href: &str) -> bool {
        self.cache_proxy_markers
            .iter()
            .any(|marker| href.contains(marker.as_str()))
    }

    /// 按配置顺序定位翻页链接，首个带href的命中生效；
    /// 找不到即视为结果页到头
    fn locate_next_page(&self, document: &Html, base_url: &Url) -> Option<Url> {
        for selector in &self.next_page_selectors {
            for anchor in document.select(selector) {
                if let Some(href) = anchor.value().attr("href") {
                    if let Ok(next) = base_url.join(href) {
                        return Some(next);
                    }
                }
            }
        }
        None
    }
}

fn parse_selectors(raw: &[String]) -> Result<Vec<Selector>, ScanConfigError> {
    raw.iter()
        .map(|s| {
            Selector::parse(s).map_err(|e| ScanConfigError::InvalidSelector {
                selector: s.clone(),
                message: e.to_string(),
            })
        })
        .collect()
}
