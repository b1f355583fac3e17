// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 应用程序模块
///
/// 包含抓取会话的编排逻辑：
/// - 命令（commands）：外部控制器下发的控制命令
/// - 抓取（extraction）：驱动逐页抓取周期的状态机
/// - 控制器（controller）：命令循环与单活动会话约束
/// - 导出（export）：累计结果的纯文本导出
pub mod commands;
pub mod controller;
pub mod export;
pub mod extraction;
