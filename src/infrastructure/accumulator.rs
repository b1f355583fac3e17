// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::domain::repositories::storage_repository::StorageRepository;
use crate::utils::errors::SessionError;

/// 合并两组主机名：集合并、字典序升序、无重复
///
/// 对相同的两组输入，无论合并顺序如何结果都一致
pub fn merge_hostnames<I>(existing: &[String], incoming: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut set: BTreeSet<String> = existing.iter().cloned().collect();
    set.extend(incoming);
    set.into_iter().collect()
}

/// 域名累加器
///
/// 排序去重的域名集合及其持久化。持久值是单个JSON文档，
/// 只通过整值读-改-写更新，从不追加或部分修改。
pub struct DomainAccumulator {
    storage: Arc<dyn StorageRepository>,
    key: String,
}

impl DomainAccumulator {
    /// 累计结果的持久键
    pub const DEFAULT_KEY: &'static str = "grabbed_domains.json";

    pub fn new(storage: Arc<dyn StorageRepository>) -> Self {
        Self {
            storage,
            key: Self::DEFAULT_KEY.to_string(),
        }
    }

    /// 读取当前累计结果；尚未写入过时为空列表
    pub async fn load(&self) -> Result<Vec<String>, SessionError> {
        match self.storage.get(&self.key).await? {
            Some(bytes) => Ok(serde_json::from_slice(&bytes)?),
            None => Ok(Vec::new()),
        }
    }

    /// 整值替换持久结果
    pub async fn replace(&self, domains: &[String]) -> Result<(), SessionError> {
        let bytes = serde_json::to_vec(domains)?;
        self.storage.save(&self.key, &bytes).await?;
        Ok(())
    }

    /// 把新发现的主机名并入持久结果并整体回写，返回合并后的列表
    pub async fn absorb<I>(&self, incoming: I) -> Result<Vec<String>, SessionError>
    where
        I: IntoIterator<Item = String> + Send,
    {
        let merged = merge_hostnames(&self.load().await?, incoming);
        self.replace(&merged).await?;
        Ok(merged)
    }
}
