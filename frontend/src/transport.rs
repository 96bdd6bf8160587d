use crate::error::{ClientError, ClientResult};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use travel_planner_shared::protocol::HttpMethod;

#[cfg(test)]
use std::cell::RefCell;

// =========================================================
// 核心抽象层 (HTTP Interface Abstraction)
// =========================================================

/// multipart 表单中的一项
#[derive(Debug, Clone, PartialEq)]
pub enum FormPart {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        content_type: String,
        bytes: Vec<u8>,
    },
}

/// 请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(String),
    Multipart(Vec<FormPart>),
}

/// 通用 HTTP 请求结构
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// 完整 URL（不含查询串）
    pub url: String,
    pub method: HttpMethod,
    pub headers: HashMap<String, String>,
    pub query: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl HttpRequest {
    pub fn new(url: &str, method: HttpMethod) -> Self {
        Self {
            url: url.to_string(),
            method,
            headers: HashMap::new(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_body(mut self, body: RequestBody) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.get(key).map(String::as_str)
    }
}

/// 通用 HTTP 响应结构
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 解析 JSON 响应体；空响应体（如 204）按 `null` 处理，可解析为 `()`
    pub fn json<T: DeserializeOwned>(&self) -> ClientResult<T> {
        let body = if self.body.trim().is_empty() {
            "null"
        } else {
            self.body.as_str()
        };
        serde_json::from_str(body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

/// HTTP 客户端特性 (Trait)
/// (?Send) 是因为浏览器环境下 JS 对象不是 Send 的
#[async_trait::async_trait(?Send)]
pub trait HttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse>;
}

// =========================================================
// 测试工具: MockHttpClient
// =========================================================

#[cfg(test)]
type SendHook = Box<dyn Fn(&HttpRequest)>;

#[cfg(test)]
pub struct MockHttpClient {
    // ((Method, URL), (Status, Response Body))
    responses: RefCell<HashMap<(String, String), (u16, String)>>,
    // 没有登记的请求返回网络错误而不是 404
    failures: RefCell<HashMap<(String, String), String>>,
    /// 记录发出的请求
    pub requests: RefCell<Vec<HttpRequest>>,
    // 发送时回调，用于观察请求进行中的状态
    on_send: RefCell<Option<SendHook>>,
}

#[cfg(test)]
impl MockHttpClient {
    pub fn new() -> Self {
        Self {
            responses: RefCell::new(HashMap::new()),
            failures: RefCell::new(HashMap::new()),
            requests: RefCell::new(Vec::new()),
            on_send: RefCell::new(None),
        }
    }

    fn key(method: HttpMethod, url: &str) -> (String, String) {
        (method.as_str().to_string(), url.to_string())
    }

    pub fn mock_response(&self, method: HttpMethod, url: &str, status: u16, body: serde_json::Value) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), (status, body.to_string()));
    }

    pub fn mock_empty(&self, method: HttpMethod, url: &str, status: u16) {
        self.responses
            .borrow_mut()
            .insert(Self::key(method, url), (status, String::new()));
    }

    pub fn mock_network_error(&self, method: HttpMethod, url: &str, message: &str) {
        self.failures
            .borrow_mut()
            .insert(Self::key(method, url), message.to_string());
    }

    pub fn on_send(&self, hook: impl Fn(&HttpRequest) + 'static) {
        *self.on_send.borrow_mut() = Some(Box::new(hook));
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[cfg(test)]
#[async_trait::async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        if let Some(hook) = self.on_send.borrow().as_ref() {
            hook(&req);
        }
        self.requests.borrow_mut().push(req.clone());

        let key = Self::key(req.method, &req.url);
        if let Some(message) = self.failures.borrow().get(&key) {
            return Err(ClientError::Transport(message.clone()));
        }

        let responses = self.responses.borrow();
        if let Some((status, body)) = responses.get(&key) {
            Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            })
        } else {
            Ok(HttpResponse {
                status: 404,
                body: r#"{"detail":"Not Found"}"#.to_string(),
            })
        }
    }
}
