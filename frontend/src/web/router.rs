//! 路由服务模块 - 核心引擎
//!
//! 封装了 web_sys 的 History API，实现高内聚：
//! 所有对 window.history 的操作都集中在此模块。
//! 实现了"监听 -> 验证 -> 处理 -> 加载"的导航流程，验证规则见
//! [`resolve_navigation`]。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;

use super::route::{AppRoute, NavigationDecision, SessionProbe, resolve_navigation};
use crate::AppUserStore;
use crate::stores::UserState;

/// 获取当前浏览器路径
fn current_path() -> String {
    web_sys::window()
        .and_then(|w| w.location().pathname().ok())
        .unwrap_or_else(|| "/".to_string())
}

/// 推送 History 状态（内部工具函数）
fn push_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.push_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 替换 History 状态（内部工具函数，用于重定向）
fn replace_history_state(path: &str) {
    if let Some(window) = web_sys::window() {
        if let Ok(history) = window.history() {
            let _ = history.replace_state_with_url(&JsValue::NULL, "", Some(path));
        }
    }
}

/// 放行时如何写入 History
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HistoryMode {
    Push,
    /// 地址栏已经是目标地址（首次加载、popstate），保留用户输入的 URL
    Keep,
}

/// 一次导航需要写入的 History 记录
#[derive(Debug, PartialEq, Eq)]
enum HistoryWrite {
    Push(String),
    Replace(String),
}

/// 计算导航结果：最终路由与需要写入的 History 记录
///
/// 重定向总是 replace；放行时按 `mode` 处理。
fn plan_navigation(
    target: AppRoute,
    session: &impl SessionProbe,
    mode: HistoryMode,
) -> (AppRoute, Option<HistoryWrite>) {
    match resolve_navigation(target, session) {
        NavigationDecision::Redirect(route) => {
            let write = HistoryWrite::Replace(route.to_path());
            (route, Some(write))
        }
        NavigationDecision::Proceed(route) => {
            let write = match mode {
                HistoryMode::Push => Some(HistoryWrite::Push(route.to_path())),
                HistoryMode::Keep => None,
            };
            (route, write)
        }
    }
}

/// 路由器服务
///
/// 封装所有路由操作，通过 Signal 驱动界面更新。
/// 会话由用户 store 注入，守卫只通过 `SessionProbe` 访问它。
#[derive(Clone, Copy)]
pub struct RouterService {
    /// 当前路由（只读信号）
    current_route: ReadSignal<AppRoute>,
    /// 设置当前路由（写入信号）
    set_route: WriteSignal<AppRoute>,
    session: StoredValue<AppUserStore>,
    /// 认证状态（由用户 store 派生）
    is_authenticated: Signal<bool>,
}

impl RouterService {
    fn new(session: AppUserStore) -> Self {
        let state = session.state();
        let is_authenticated = Signal::derive(move || state.with(UserState::is_authenticated));
        let (current_route, set_route) = signal(AppRoute::from_path(&current_path()));

        Self {
            current_route,
            set_route,
            session: StoredValue::new(session),
            is_authenticated,
        }
    }

    /// 获取当前路由信号
    pub fn current_route(&self) -> ReadSignal<AppRoute> {
        self.current_route
    }

    /// **核心方法：导航与守卫**
    ///
    /// 流程：请求 -> 验证(Guard) -> 处理 -> 加载
    pub fn navigate(&self, path: &str) {
        self.navigate_to_route(AppRoute::from_path(path), HistoryMode::Push);
    }

    fn navigate_to_route(&self, target: AppRoute, mode: HistoryMode) {
        // --- Step 1: 验证目标路由 ---
        let (route, write) = self
            .session
            .with_value(|session| plan_navigation(target, session, mode));

        // --- Step 2: 加载页面 (更新状态) ---
        match write {
            Some(HistoryWrite::Replace(path)) => {
                log_info!("[Router] Redirecting to {}", path);
                replace_history_state(&path);
            }
            Some(HistoryWrite::Push(path)) => push_history_state(&path),
            None => {}
        }
        self.set_route.set(route);
    }

    /// 初始化浏览器后退/前进按钮监听
    fn init_popstate_listener(&self) {
        let router = *self;

        let closure = Closure::<dyn Fn()>::new(move || {
            // popstate 时也执行守卫逻辑
            router.navigate_to_route(AppRoute::from_path(&current_path()), HistoryMode::Keep);
        });

        if let Some(window) = web_sys::window() {
            let _ = window
                .add_event_listener_with_callback("popstate", closure.as_ref().unchecked_ref());
        }

        // 泄漏闭包以保持监听器存活
        closure.forget();
    }

    /// 认证状态变化时重新校验当前路由
    ///
    /// 登出后离开受保护页面，登录后离开登录页。
    fn setup_auth_redirect(&self) {
        let router = *self;

        Effect::new(move |_| {
            let is_auth = router.is_authenticated.get();
            let route = router.current_route.get_untracked();
            log_info!("[Router] Auth state changed (authenticated: {})", is_auth);
            router.navigate_to_route(route, HistoryMode::Keep);
        });
    }
}

/// 提供路由服务到 Context 并初始化
fn provide_router(session: AppUserStore) -> RouterService {
    let router = RouterService::new(session);

    // 首次加载同样经过守卫，放行时不改写地址栏
    let initial = router.current_route.get_untracked();
    router.navigate_to_route(initial, HistoryMode::Keep);

    // 初始化监听器
    router.init_popstate_listener();
    router.setup_auth_redirect();

    provide_context(router);
    router
}

/// 从 Context 获取路由服务
pub fn use_router() -> RouterService {
    use_context::<RouterService>()
        .expect("RouterService not found in context. Ensure Router is provided.")
}

/// 导航函数（返回一个可调用的闭包）
pub fn use_navigate() -> impl Fn(&str) + Clone {
    let router = use_router();
    move |to: &str| {
        router.navigate(to);
    }
}

// ============================================================================
// UI 组件
// ============================================================================

/// 路由器根组件
///
/// 提供路由上下文，应在 App 根部使用。
#[component]
pub fn Router(
    /// 用户会话 store
    session: AppUserStore,
    /// 子组件
    children: Children,
) -> impl IntoView {
    // 提供路由服务到 Context
    provide_router(session);

    children()
}

/// 路由出口组件
///
/// 根据当前路由状态渲染对应的组件。
#[component]
pub fn RouterOutlet(
    /// 路由匹配函数：接收当前路由，返回对应视图
    matcher: fn(AppRoute) -> AnyView,
) -> impl IntoView {
    let router = use_router();

    move || {
        let current = router.current_route().get();
        matcher(current)
    }
}

/// 站内链接，点击时走路由守卫而不是整页跳转
#[component]
pub fn Link(
    /// 目标路径
    #[prop(into)]
    to: String,
    /// 子内容
    children: Children,
) -> impl IntoView {
    let navigate = use_navigate();

    let target = to.clone();
    let on_click = move |ev: web_sys::MouseEvent| {
        ev.prevent_default();
        navigate(&target);
    };

    view! {
        <a href=to on:click=on_click>
            {children()}
        </a>
    }
}
