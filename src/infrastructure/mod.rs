// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层模块
///
/// 该模块包含系统的技术实现细节，提供对具体技术的抽象和封装。
///
/// 包含的子模块：
/// - 存储（storage）：整值键值存储的本地与内存实现
/// - 扫描（scan）：基于选择器的结果页扫描与域名过滤
/// - 累加器（accumulator）：去重排序的域名集合及其持久化
/// - 会话存储（session_store）：会话状态的持久记录
///
/// 基础设施层遵循依赖倒置原则，依赖于领域层的抽象接口。
pub mod accumulator;
pub mod scan;
pub mod session_store;
pub mod storage;
