//! 用户会话 store
//!
//! 管理用户认证状态，与路由系统解耦。
//! 路由守卫通过 [`SessionProbe`] 检查/恢复会话。
//!
//! 不变式：`profile` 与 `token` 同时为空或同时有值。

use std::sync::Arc;

use leptos::prelude::*;
use travel_planner_shared::{
    AuthResponse, LoginRequest, RegisterRequest, STORAGE_KEY_USER_ID, STORAGE_KEY_USERNAME,
    UserProfile,
};

use super::{ActionState, run_action};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;
use crate::web::route::SessionProbe;

/// 认证状态
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserState {
    pub profile: Option<UserProfile>,
    pub token: Option<String>,
    pub loading: bool,
    pub error: Option<String>,
}

impl UserState {
    pub fn is_authenticated(&self) -> bool {
        self.profile.is_some()
    }
}

impl ActionState for UserState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct UserStore<C, S> {
    state: ArcRwSignal<UserState>,
    api: Arc<ApiClient<C, S>>,
}

impl<C, S> Clone for UserStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> UserStore<C, S> {
    pub fn new(api: Arc<ApiClient<C, S>>) -> Self {
        Self {
            state: ArcRwSignal::new(UserState::default()),
            api,
        }
    }

    pub fn state(&self) -> ArcRwSignal<UserState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> UserState {
        self.state.get_untracked()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with_untracked(UserState::is_authenticated)
    }

    /// 写入会话，同时让后续请求携带该用户身份
    pub fn set_session(&self, profile: UserProfile, token: String) {
        self.api.credentials().set_user_id(profile.id.clone());
        self.state.update(|s| {
            s.profile = Some(profile);
            s.token = Some(token);
        });
    }

    /// 注销：清空会话与本地保存的登录信息
    pub fn clear_session(&self) {
        self.state.update(|s| {
            s.profile = None;
            s.token = None;
        });
        self.api.clear_auth_storage();
    }

    pub fn set_loading(&self, loading: bool) {
        self.state.update(|s| s.loading = loading);
    }

    pub fn set_error(&self, message: Option<String>) {
        self.state.update(|s| s.error = message);
    }

    /// 从本地存储恢复会话（不发请求）
    ///
    /// 两个键都存在时才恢复，token 以用户 id 占位。可重复调用。
    /// 返回恢复后是否处于登录状态。
    pub fn hydrate_from_storage(&self) -> bool {
        let storage = self.api.storage();
        let stored = storage
            .get(STORAGE_KEY_USER_ID)
            .filter(|v| !v.is_empty())
            .zip(storage.get(STORAGE_KEY_USERNAME).filter(|v| !v.is_empty()));

        if let Some((id, username)) = stored {
            let unchanged = self
                .state
                .with_untracked(|s| s.profile.as_ref().is_some_and(|p| p.id == id && p.username == username));
            if !unchanged {
                log_info!("[Session] Restored session for {}", username);
                self.set_session(UserProfile::new(id.clone(), username), id);
            }
        }

        self.is_authenticated()
    }

    /// 保存登录结果并写入会话
    fn establish(&self, resp: &AuthResponse) {
        let storage = self.api.storage();
        storage.set(STORAGE_KEY_USER_ID, &resp.user.id);
        storage.set(STORAGE_KEY_USERNAME, &resp.user.username);
        self.set_session(resp.user.clone(), resp.user.id.clone());
    }

    pub async fn login(&self, payload: &LoginRequest) -> ClientResult<UserProfile> {
        let resp = run_action(
            &self.state,
            "logging in",
            self.api.auth().login(payload),
            |_, _: &AuthResponse| {},
        )
        .await?;
        self.establish(&resp);
        Ok(resp.user)
    }

    pub async fn register(&self, payload: &RegisterRequest) -> ClientResult<UserProfile> {
        let resp = run_action(
            &self.state,
            "registering",
            self.api.auth().register(payload),
            |_, _: &AuthResponse| {},
        )
        .await?;
        self.establish(&resp);
        Ok(resp.user)
    }
}

impl<C: HttpClient, S: KeyValueStorage> SessionProbe for UserStore<C, S> {
    fn has_profile(&self) -> bool {
        self.is_authenticated()
    }

    fn hydrate(&self) -> bool {
        self.hydrate_from_storage()
    }
}

#[cfg(test)]
mod tests;
