// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::repositories::storage_repository::StorageError;
use crate::engines::traits::EngineError;
use thiserror::Error;

/// 会话错误类型
///
/// 抓取会话运行期间可能出现的错误；周期内的持久化
/// 写入总是先于终止判定完成，所以这些错误不会丢失已收集的结果
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error("抓取引擎错误: {0}")]
    Engine(#[from] EngineError),

    #[error("序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("无效参数: {0}")]
    InvalidParameter(String),

    #[error("内部错误: {0}")]
    InternalError(String),
}
