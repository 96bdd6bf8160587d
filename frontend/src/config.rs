//! 运行时配置
//!
//! 浏览器端没有进程环境变量，配置在编译期通过 `option_env!` 注入，
//! 缺省时使用下列默认值。

/// 这些是默认值，如果构建时没有设置对应环境变量，则使用这些值
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub const ENV_API_BASE_URL: &str = "TRAVEL_API_BASE_URL";
pub const ENV_MAP_API_KEY: &str = "TRAVEL_MAP_API_KEY";

/// 应用配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    /// 高德地图 Web API Key，缺失时地图无法加载
    pub map_api_key: Option<String>,
}

impl AppConfig {
    /// 读取编译期环境
    pub fn from_env() -> Self {
        Self::from_lookup(|name| match name {
            ENV_API_BASE_URL => option_env!("TRAVEL_API_BASE_URL").map(str::to_string),
            ENV_MAP_API_KEY => option_env!("TRAVEL_MAP_API_KEY").map(str::to_string),
            _ => None,
        })
    }

    /// 从任意来源读取配置，空字符串视为未设置
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: read(ENV_API_BASE_URL)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            map_api_key: read(ENV_MAP_API_KEY),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
