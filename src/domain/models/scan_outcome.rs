// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeSet;
use url::Url;

/// 单个结果页的扫描产出
///
/// 每个周期重新生成的瞬态值，不持久化。
/// `next_page` 为 None 表示翻页到头，与"本页没有新域名"是
/// 两个互相独立的事实。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOutcome {
    /// 本页发现的外部主机名（小写，已排除提供方域名）
    pub hostnames: BTreeSet<String>,
    /// 下一张结果页的URL
    pub next_page: Option<Url>,
}
