// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含存储、抓取引擎、页面扫描规则和会话默认值等所有配置项。
/// 选择器规则与排除域名列表属于配置数据而非代码，
/// 便于在不改动代码的情况下切换搜索提供方的页面变体。
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 存储配置
    pub storage: StorageSettings,
    /// 抓取引擎配置
    pub fetcher: FetcherSettings,
    /// 页面扫描配置
    #[serde(default)]
    pub scan: ScanSettings,
    /// 会话默认配置
    pub session: SessionSettings,
    /// 导出配置
    #[serde(default)]
    pub export: ExportSettings,
}

/// 存储配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// 存储类型 (local, memory)
    pub storage_type: String,
    /// 本地存储路径 (当 type=local 时使用)
    pub local_path: Option<String>,
}

/// 抓取引擎配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct FetcherSettings {
    /// 请求使用的 User-Agent
    pub user_agent: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

/// 页面扫描配置设置
///
/// 默认值对应 Google 结果页的 DOM 锚点变体
#[derive(Debug, Clone, Deserialize)]
pub struct ScanSettings {
    /// 结果链接选择器（并集，全部应用）
    #[serde(default = "default_result_selectors")]
    pub result_selectors: Vec<String>,
    /// 翻页链接选择器（有序，首个命中生效）
    #[serde(default = "default_next_page_selectors")]
    pub next_page_selectors: Vec<String>,
    /// 缓存代理路径标记；链接命中任一标记时在提取主机名前丢弃
    #[serde(default = "default_cache_proxy_markers")]
    pub cache_proxy_markers: Vec<String>,
    /// 排除域名列表（搜索提供方自身的域名及其子域）
    #[serde(default = "default_excluded_domains")]
    pub excluded_domains: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            result_selectors: default_result_selectors(),
            next_page_selectors: default_next_page_selectors(),
            cache_proxy_markers: default_cache_proxy_markers(),
            excluded_domains: default_excluded_domains(),
        }
    }
}

fn default_result_selectors() -> Vec<String> {
    vec![
        r##"#search .g a[href^="http"]"##.to_string(),
        r##"#rso a[href^="http"]"##.to_string(),
        r##"div#search a[href^="http"]"##.to_string(),
    ]
}

fn default_next_page_selectors() -> Vec<String> {
    vec![
        r#"a[aria-label="Next page"]"#.to_string(),
        "a#pnnext".to_string(),
    ]
}

fn default_cache_proxy_markers() -> Vec<String> {
    vec!["webcache.googleusercontent.com".to_string()]
}

fn default_excluded_domains() -> Vec<String> {
    [
        "google.com",
        "google.co.id",
        "google.co.uk",
        "google.ca",
        "google.jp",
        "google.de",
        "google.fr",
        "google.it",
        "google.es",
        "google.br",
        "google.ru",
        "google.cn",
        "gstatic.com",
        "googleusercontent.com",
        "youtube.com",
        "blogger.com",
        "wordpress.com",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// 会话默认配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    /// 第一张结果页的URL
    pub start_url: Option<String>,
    /// 搜索词；未提供 start_url 时由二进制入口扩展为搜索URL
    pub query: Option<String>,
    /// 最多抓取的结果页数
    pub max_pages: u32,
    /// 翻页基础停顿（毫秒）
    pub pause_ms: u64,
}

/// 导出配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// 导出文件名前缀
    #[serde(default = "default_export_prefix")]
    pub prefix: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            prefix: default_export_prefix(),
        }
    }
}

fn default_export_prefix() -> String {
    "Google_Grab".to_string()
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从配置文件与环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Default Storage settings
            .set_default("storage.storage_type", "local")?
            .set_default("storage.local_path", "./storage")?
            // Default Fetcher settings
            .set_default("fetcher.user_agent", "Mozilla/5.0 (compatible; grabrs/1.0)")?
            .set_default("fetcher.timeout_secs", 30)?
            // Default Session settings
            .set_default("session.max_pages", 10)?
            .set_default("session.pause_ms", 2000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("GRABRS").separator("__"));

        builder.build()?.try_deserialize()
    }
}
