use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub mod date;
pub mod protocol;

// 日期字段的类型，前端无需单独依赖 chrono
pub use chrono::NaiveDate;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_USER_ID: &str = "X-User-ID";
pub const STORAGE_KEY_USER_ID: &str = "userId";
pub const STORAGE_KEY_USERNAME: &str = "username";

pub const DEFAULT_ITINERARY_LIMIT: u32 = 20;
pub const DEFAULT_LANGUAGE: &str = "zh_cn";

// =========================================================
// 用户 (User)
// =========================================================

/// 已认证用户的身份信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl UserProfile {
    /// 仅由 id 与用户名构造（本地恢复会话时没有创建时间）
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            created_at: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// 注册/登录成功后的响应，用户信息嵌套在 `user` 字段中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
}

// =========================================================
// 行程 (Itinerary)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferenceType {
    Cultural,
    Adventure,
    Relaxation,
    Food,
    Shopping,
    Nature,
    Nightlife,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryRequest {
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default)]
    pub preferences: Vec<PreferenceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_notes: Option<String>,
}

/// 自然语言描述的行程需求
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryTextRequest {
    pub text: String,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityItem {
    pub time: String,
    pub activity: String,
    pub location: String,
    #[serde(default)]
    pub estimated_cost: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayItinerary {
    pub day: u32,
    pub date: NaiveDate,
    pub activities: Vec<ActivityItem>,
    #[serde(default)]
    pub total_estimated_cost: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    #[serde(default)]
    pub id: Option<String>,
    pub destination: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub budget: f64,
    #[serde(default)]
    pub daily_itinerary: Vec<DayItinerary>,
    #[serde(default)]
    pub total_estimated_cost: f64,
    #[serde(default)]
    pub recommendations: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Itinerary {
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryFromText {
    pub itinerary: Itinerary,
    pub prompt: String,
    pub parsed_request: ItineraryRequest,
}

/// 预算执行情况（计划 vs 实际）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetStatus {
    pub itinerary_id: String,
    pub planned_budget: f64,
    pub estimated_cost: f64,
    pub actual_spent: f64,
    pub remaining: f64,
    pub spent_percentage: f64,
    #[serde(default)]
    pub expense_breakdown: HashMap<ExpenseCategory, f64>,
}

// =========================================================
// 开销 (Expense)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Accommodation,
    Food,
    Transportation,
    Activities,
    Shopping,
    Other,
}

impl ExpenseCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Accommodation => "accommodation",
            ExpenseCategory::Food => "food",
            ExpenseCategory::Transportation => "transportation",
            ExpenseCategory::Activities => "activities",
            ExpenseCategory::Shopping => "shopping",
            ExpenseCategory::Other => "other",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub itinerary_id: Option<String>,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseCreate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_id: Option<String>,
    pub category: ExpenseCategory,
    pub amount: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// 部分更新，未设置的字段不会发送
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// 开销列表的过滤条件，原样转为查询参数
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExpenseQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub itinerary_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseSummary {
    pub total_expenses: f64,
    #[serde(default)]
    pub by_category: HashMap<ExpenseCategory, f64>,
    pub count: u32,
}

// =========================================================
// 导航 (Navigation)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
    pub longitude: f64,
    pub latitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walking,
    #[default]
    Transit,
    Driving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteInfo {
    /// 公里
    pub distance: f64,
    /// 分钟
    pub duration: f64,
    pub steps: Vec<String>,
}

// =========================================================
// 语音 (Voice)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcription {
    pub text: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// 待上传的录音文件
#[derive(Debug, Clone, PartialEq)]
pub struct AudioFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
