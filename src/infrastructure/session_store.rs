// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use crate::domain::models::session_state::SessionState;
use crate::domain::repositories::storage_repository::StorageRepository;
use crate::utils::errors::SessionError;

/// 会话状态存储
///
/// 会话状态的整值持久记录。状态机是唯一写入方；
/// 状态查询方可以并发读取，依赖底层存储的原子整值替换，
/// 只会看到某次完整写入之前或之后的快照。
pub struct SessionStore {
    storage: Arc<dyn StorageRepository>,
    key: String,
}

impl SessionStore {
    /// 会话状态的持久键
    pub const DEFAULT_KEY: &'static str = "session_state.json";

    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self {
            storage,
            key: Self::DEFAULT_KEY.to_string(),
        }
    }

    /// 读取会话状态；从未启动过会话时为 None
    pub async fn load(&self) -> Result<Option<SessionState>, SessionError> {
        match self.storage.get(&self.key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// 整值替换会话状态
    pub async fn save(&self, state: &SessionState) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(state)?;
        self.storage.save(&self.key, &bytes).await?;
        Ok(())
    }
}
