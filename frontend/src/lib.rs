//! 旅行规划前端应用
//!
//! 采用 Context-Driven 的高内聚低耦合架构：
//! - `api` / `services`: HTTP 客户端与按资源划分的 REST 调用
//! - `stores`: 缓存服务端数据的响应式状态
//! - `map_loader`: 地图 SDK 的单次加载
//! - `web::route`: 路由定义与导航守卫（领域模型）
//! - `web::router`: 路由服务（核心引擎）

// =========================================================
// 日志宏 (浏览器写 console，原生环境走 tracing)
// =========================================================

#[cfg(target_arch = "wasm32")]
macro_rules! log_info {
    ($($t:tt)*) => (::web_sys::console::log_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_info {
    ($($t:tt)*) => (::tracing::info!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_warn {
    ($($t:tt)*) => (::web_sys::console::warn_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_warn {
    ($($t:tt)*) => (::tracing::warn!($($t)*))
}

#[cfg(target_arch = "wasm32")]
macro_rules! log_error {
    ($($t:tt)*) => (::web_sys::console::error_1(&format!($($t)*).into()))
}

#[cfg(not(target_arch = "wasm32"))]
macro_rules! log_error {
    ($($t:tt)*) => (::tracing::error!($($t)*))
}

pub mod api;
pub mod config;
pub mod error;
pub mod map_loader;
pub mod services;
pub mod stores;
pub mod transport;

// 浏览器 API 封装模块
// 其余模块只依赖这里导出的 trait，测试时替换为内存实现。
pub mod web {
    mod http;
    pub mod route;
    pub mod router;
    pub mod script;
    mod storage;

    pub use http::FetchHttpClient;
    #[cfg(test)]
    pub use storage::MemoryStorage;
    pub use storage::{KeyValueStorage, LocalStorage};
}

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::stores::{ExpenseStore, ItineraryStore, UserStore, VoiceStore};
use crate::web::route::{AppRoute, ROUTES};
use crate::web::router::{Link, Router, RouterOutlet};
use crate::web::{FetchHttpClient, LocalStorage};

pub type BrowserApi = ApiClient<FetchHttpClient, LocalStorage>;
pub type AppUserStore = UserStore<FetchHttpClient, LocalStorage>;
pub type AppItineraryStore = ItineraryStore<FetchHttpClient, LocalStorage>;
pub type AppExpenseStore = ExpenseStore<FetchHttpClient, LocalStorage>;

/// 路由页面占位，具体页面由视图层提供
#[component]
fn RoutePage(route: AppRoute) -> impl IntoView {
    let links = ROUTES
        .iter()
        .filter(|r| !r.path.contains(':'))
        .map(|r| view! { <Link to=r.path>{r.name}</Link> })
        .collect_view();

    view! {
        <main data-route=route.name()>
            <nav class="flex gap-4">{links}</nav>
            <h1 class="text-2xl font-bold">{route.name()}</h1>
        </main>
    }
}

/// 路由匹配函数
///
/// 根据 AppRoute 枚举返回对应的视图组件。
fn route_matcher(route: AppRoute) -> AnyView {
    match route {
        AppRoute::NotFound => view! {
            <div class="flex items-center justify-center min-h-screen bg-base-200">
                <div class="text-center">
                    <h1 class="text-6xl font-bold text-error">"404"</h1>
                    <p class="text-xl mt-4">"页面未找到"</p>
                </div>
            </div>
        }
        .into_any(),
        route => view! { <RoutePage route=route /> }.into_any(),
    }
}

#[component]
pub fn App() -> impl IntoView {
    // 1. 读取配置并创建共享的 API 客户端
    let config = AppConfig::from_env();
    log_info!("[App] Using API at {}", config.api_base_url);
    let api: Arc<BrowserApi> = Arc::new(ApiClient::new(
        &config.api_base_url,
        FetchHttpClient,
        LocalStorage,
    ));

    // 2. 创建 store 并通过 Context 提供给视图
    let user: AppUserStore = UserStore::new(api.clone());
    provide_context(user.clone());
    provide_context::<AppItineraryStore>(ItineraryStore::new(api.clone()));
    provide_context::<AppExpenseStore>(ExpenseStore::new(api.clone()));
    provide_context(VoiceStore::new());
    provide_context(api);

    view! {
        // 3. 路由器组件：注入用户会话实现守卫
        <Router session=user>
            <RouterOutlet matcher=route_matcher />
        </Router>
    }
}
