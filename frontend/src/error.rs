//! 客户端错误类型
//!
//! 所有服务调用失败都归结为 `ClientError`，其 `Display` 文本即 store 中记录的 `error`。

use thiserror::Error;

/// HTTP 客户端错误
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// 请求构建失败
    #[error("请求构建失败: {0}")]
    Request(String),

    /// 网络请求失败（未拿到响应）
    #[error("网络错误: {0}")]
    Transport(String),

    /// 服务端返回非 2xx
    #[error("{message}")]
    Status { status: u16, message: String },

    /// 请求体序列化失败
    #[error("请求体序列化失败: {0}")]
    Encode(String),

    /// 响应体与预期结构不符
    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl ClientError {
    /// 由非 2xx 响应构造，优先使用 FastAPI 的 `detail` 字段
    pub fn from_status(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(str::to_string));

        Self::Status {
            status,
            message: detail.unwrap_or_else(|| format!("Request failed with status code {status}")),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
