// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 提供跨层共享的辅助功能：
/// - 错误（errors）：会话级错误类型
/// - 遥测（telemetry）：日志订阅器初始化
pub mod errors;
pub mod telemetry;
