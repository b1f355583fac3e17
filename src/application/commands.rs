// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::Url;

/// 外部控制命令
#[derive(Debug, Clone)]
pub enum ControlCommand {
    /// 开始一次新的抓取会话；已有会话在运行时忽略
    Start(StartParams),
    /// 取消当前会话；没有活动会话时无操作
    Stop,
    /// 把累计结果导出为带时间戳的纯文本文件
    RequestDownload,
}

/// 会话启动参数
#[derive(Debug, Clone)]
pub struct StartParams {
    /// 第一张结果页
    pub start_url: Url,
    /// 最多抓取的结果页数（≥1）
    pub max_pages: u32,
    /// 翻页基础停顿（毫秒）
    pub pause_ms: u64,
}
