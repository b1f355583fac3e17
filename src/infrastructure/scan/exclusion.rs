// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 排除域名列表
///
/// 搜索提供方自身的域名集合。主机名与某个条目完全相等、
/// 或以 `"." + 条目` 结尾（即其子域）时命中。比较不区分大小写。
#[derive(Debug, Clone)]
pub struct ExclusionList {
    entries: Vec<String>,
}

impl ExclusionList {
    /// 从配置条目构建；条目统一转为小写，空白条目忽略
    pub fn new<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|e| e.as_ref().trim().to_ascii_lowercase())
            .filter(|e| !e.is_empty())
            .collect();
        Self { entries }
    }

    /// 判断主机名是否属于排除集合
    pub fn is_excluded(&self, hostname: &str) -> bool {
        let host = hostname.trim().to_ascii_lowercase();
        if host.is_empty() {
            return false;
        }
        self.entries.iter().any(|entry| {
            host == *entry
                || host
                    .strip_suffix(entry.as_str())
                    .is_some_and(|rest| rest.ends_with('.'))
        })
    }
}
