// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 会话持久状态
///
/// 每个抓取周期结束后整值重写一次；任何终止路径都会把
/// `is_extracting` 清零后落盘。记录在终止后保留，直到下一次
/// 启动命令将其重置，以便重启后仍能展示上次的结果。
///
/// 不变量：每个完成的周期之后 `domains_count` 等于累计结果的长度。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// 会话是否仍在运行
    pub is_extracting: bool,
    /// 已完成的结果页数
    pub current_page: u32,
    /// 页数上限（≥1）
    pub max_pages: u32,
    /// 翻页基础停顿（毫秒）
    pub pause_ms: u64,
    /// 累计去重后的域名数量
    pub domains_count: usize,
}

impl SessionState {
    /// 启动命令产生的初始状态
    pub fn started(max_pages: u32, pause_ms: u64) -> Self {
        Self {
            is_extracting: false,
            current_page: 0,
            max_pages,
            pause_ms,
            domains_count: 0,
        }
        .activated()
    }

    fn activated(mut self) -> Self {
        self.is_extracting = true;
        self
    }

    /// 终止路径上的状态：仅清除运行标志，其余字段保留
    pub fn deactivated(mut self) -> Self {
        self.is_extracting = false;
        self
    }
}
