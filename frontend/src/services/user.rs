use travel_planner_shared::{AuthResponse, LoginRequest, RegisterRequest};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

/// 注册/登录
pub struct AuthService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> AuthService<'a, C, S> {
    pub(crate) fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<AuthResponse> {
        self.api.call(payload).await
    }

    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<AuthResponse> {
        self.api.call(payload).await
    }
}
