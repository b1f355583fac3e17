// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 会话通知事件
///
/// 由状态机向观察者广播，尽力投递、无需确认、允许丢失；
/// 观察者随时可以读取持久的会话状态重建当前事实。
/// 用户主动停止与失败共用 `Error` 形态，仅靠消息文本区分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// 每完成一个抓取周期发出一次
    Progress {
        current_page: u32,
        max_pages: u32,
        domains_count: usize,
    },
    /// 正常终止（翻页耗尽或达到页数上限）
    Completed {
        domains_count: usize,
        current_page: u32,
        reason: String,
    },
    /// 异常终止或用户停止
    Error {
        message: String,
        domains_count: usize,
        current_page: u32,
    },
}
