//! API 客户端
//!
//! 预先配置 base URL 的请求入口。用户身份通过显式的 [`Credentials`] 注入，
//! 每个请求在有用户 id 时附带 `X-User-ID` 头。

use std::sync::{Arc, RwLock};

use serde::de::DeserializeOwned;
use travel_planner_shared::protocol::{ApiRequest, HttpMethod};
use travel_planner_shared::{HEADER_USER_ID, STORAGE_KEY_USER_ID, STORAGE_KEY_USERNAME};

use crate::error::{ClientError, ClientResult};
use crate::services::{
    AuthService, ExpenseService, ItineraryService, NavigationService, VoiceService,
};
use crate::transport::{HttpClient, HttpRequest, RequestBody};
use crate::web::KeyValueStorage;

/// 当前请求身份（用户 id），由用户 store 写入
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    user_id: Arc<RwLock<Option<String>>>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_id(&self) -> Option<String> {
        self.user_id.read().ok().and_then(|id| id.clone())
    }

    pub fn set_user_id(&self, id: impl Into<String>) {
        if let Ok(mut slot) = self.user_id.write() {
            *slot = Some(id.into());
        }
    }

    pub fn clear(&self) {
        if let Ok(mut slot) = self.user_id.write() {
            *slot = None;
        }
    }
}

pub struct ApiClient<C, S> {
    base_url: String,
    transport: C,
    storage: S,
    credentials: Credentials,
}

impl<C: HttpClient, S: KeyValueStorage> ApiClient<C, S> {
    pub fn new(base_url: &str, transport: C, storage: S) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            storage,
            credentials: Credentials::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &C {
        &self.transport
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// 发送请求并解析响应体
    ///
    /// 传输失败与非 2xx 响应都返回 `Err`，不做重试。
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<RequestBody>,
        params: &[(&str, String)],
        headers: &[(&str, &str)],
    ) -> ClientResult<T> {
        let mut req = HttpRequest::new(&self.url(path), method);

        for (key, value) in params {
            req = req.with_query(key, value);
        }
        for (key, value) in headers {
            req = req.with_header(key, value);
        }
        if let Some(user_id) = self.credentials.user_id() {
            req = req.with_header(HEADER_USER_ID, &user_id);
        }
        if let Some(body) = body {
            req = req.with_body(body);
        }

        let res = self.transport.send(req).await?;

        if !res.ok() {
            return Err(ClientError::from_status(res.status, &res.body));
        }

        res.json::<T>()
    }

    /// 发送类型化的端点请求
    pub async fn call<R: ApiRequest>(&self, req: &R) -> ClientResult<R::Response> {
        let body = if R::METHOD.has_body() {
            let json = serde_json::to_string(req).map_err(|e| ClientError::Encode(e.to_string()))?;
            Some(RequestBody::Json(json))
        } else {
            None
        };

        self.request(R::METHOD, &req.path(), body, &req.query(), &[])
            .await
    }

    /// 清除本地保存的登录信息
    pub fn clear_auth_storage(&self) {
        self.storage.delete(STORAGE_KEY_USER_ID);
        self.storage.delete(STORAGE_KEY_USERNAME);
        self.credentials.clear();
    }

    pub fn itineraries(&self) -> ItineraryService<'_, C, S> {
        ItineraryService::new(self)
    }

    pub fn expenses(&self) -> ExpenseService<'_, C, S> {
        ExpenseService::new(self)
    }

    pub fn navigation(&self) -> NavigationService<'_, C, S> {
        NavigationService::new(self)
    }

    pub fn voice(&self) -> VoiceService<'_, C, S> {
        VoiceService::new(self)
    }

    pub fn auth(&self) -> AuthService<'_, C, S> {
        AuthService::new(self)
    }
}
