//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由及其属性，以及导航守卫的判定规则。

use std::fmt::Display;

/// 路由表中的一项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteRecord {
    /// 路径模式，`:id` 为动态段
    pub path: &'static str,
    pub name: &'static str,
    pub requires_auth: bool,
}

/// 有序路由表（供视图层读取）
pub const ROUTES: &[RouteRecord] = &[
    RouteRecord {
        path: "/",
        name: "Home",
        requires_auth: true,
    },
    RouteRecord {
        path: "/auth",
        name: "Auth",
        requires_auth: false,
    },
    RouteRecord {
        path: "/itineraries",
        name: "ItineraryList",
        requires_auth: true,
    },
    RouteRecord {
        path: "/itineraries/create",
        name: "CreateItinerary",
        requires_auth: true,
    },
    RouteRecord {
        path: "/itineraries/:id",
        name: "ItineraryDetail",
        requires_auth: true,
    },
    RouteRecord {
        path: "/expenses",
        name: "ExpenseTracker",
        requires_auth: true,
    },
];

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 首页 (默认路由)
    #[default]
    Home,
    /// 登录/注册
    Auth,
    ItineraryList,
    /// 新建行程，须先于 `ItineraryDetail` 匹配
    CreateItinerary,
    ItineraryDetail(String),
    ExpenseTracker,
    /// 页面未找到（不在路由表中）
    NotFound,
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举，忽略末尾的 `/`
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Home,
            ["auth"] => Self::Auth,
            ["itineraries"] => Self::ItineraryList,
            ["itineraries", "create"] => Self::CreateItinerary,
            ["itineraries", id] => Self::ItineraryDetail((*id).to_string()),
            ["expenses"] => Self::ExpenseTracker,
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::ItineraryDetail(id) => format!("/itineraries/{id}"),
            Self::NotFound => "/404".to_string(),
            other => other
                .record()
                .map(|r| r.path.to_string())
                .unwrap_or_else(|| "/".to_string()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Auth => "Auth",
            Self::ItineraryList => "ItineraryList",
            Self::CreateItinerary => "CreateItinerary",
            Self::ItineraryDetail(_) => "ItineraryDetail",
            Self::ExpenseTracker => "ExpenseTracker",
            Self::NotFound => "NotFound",
        }
    }

    /// 对应的路由表项；`NotFound` 没有
    pub fn record(&self) -> Option<&'static RouteRecord> {
        let name = self.name();
        ROUTES.iter().find(|r| r.name == name)
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        self.record().is_some_and(|r| r.requires_auth)
    }

    /// 定义已认证用户是否应该离开此路由（如登录页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Auth)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Auth
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Home
    }
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

// =========================================================
// 导航守卫
// =========================================================

/// 守卫所需的会话能力，由用户 store 实现
pub trait SessionProbe {
    fn has_profile(&self) -> bool;
    /// 从持久化存储恢复会话，返回恢复后是否已登录
    fn hydrate(&self) -> bool;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    Proceed(AppRoute),
    /// 重定向（以 replace 方式写入历史）
    Redirect(AppRoute),
}

impl NavigationDecision {
    pub fn route(&self) -> &AppRoute {
        match self {
            Self::Proceed(route) | Self::Redirect(route) => route,
        }
    }
}

/// 判定一次导航：没有会话时先尝试恢复，再按规则放行或重定向
pub fn resolve_navigation(target: AppRoute, session: &impl SessionProbe) -> NavigationDecision {
    let authenticated = session.has_profile() || session.hydrate();

    if target.requires_auth() && !authenticated {
        return NavigationDecision::Redirect(AppRoute::auth_failure_redirect());
    }
    if target.should_redirect_when_authenticated() && authenticated {
        return NavigationDecision::Redirect(AppRoute::auth_success_redirect());
    }
    NavigationDecision::Proceed(target)
}
