// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 会话状态（session_state）：抓取会话的持久记录
/// - 扫描结果（scan_outcome）：单个结果页的瞬态产出
/// - 会话事件（events）：向观察者广播的通知
pub mod events;
pub mod scan_outcome;
pub mod session_state;
