// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Utc};
use std::sync::Arc;

use crate::domain::repositories::storage_repository::StorageRepository;
use crate::infrastructure::accumulator::DomainAccumulator;
use crate::utils::errors::SessionError;

/// 域名导出器
///
/// 把累计结果序列化为换行拼接的纯文本文件，
/// 文件名带ISO-8601派生的时间戳
pub struct DomainExporter {
    storage: Arc<dyn StorageRepository>,
    accumulator: DomainAccumulator,
    prefix: String,
}

impl DomainExporter {
    pub fn new(storage: Arc<dyn StorageRepository>, prefix: impl Into<String>) -> Self {
        Self {
            accumulator: DomainAccumulator::new(Arc::clone(&storage)),
            storage,
            prefix: prefix.into(),
        }
    }

    /// 导出当前累计结果，返回写入的文件名；结果为空时不导出
    pub async fn export(&self) -> Result<Option<String>, SessionError> {
        let domains = self.accumulator.load().await?;
        if domains.is_empty() {
            return Ok(None);
        }

        let filename = export_filename(&self.prefix, Utc::now());
        self.storage
            .save(&filename, domains.join("\n").as_bytes())
            .await?;
        Ok(Some(filename))
    }
}

/// 导出文件名：`{前缀}_{时间戳}.txt`
///
/// 时间戳取UTC的ISO-8601形式，冒号与点替换为连字符，毫秒去掉
pub fn export_filename(prefix: &str, now: DateTime<Utc>) -> String {
    format!("{}_{}.txt", prefix, now.format("%Y-%m-%dT%H-%M-%S"))
}
