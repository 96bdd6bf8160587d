use crate::{
    AuthResponse, BudgetStatus, Expense, ExpenseCreate, ExpenseQuery, ExpenseSummary,
    ExpenseUpdate, Itinerary, ItineraryFromText, ItineraryRequest, ItineraryTextRequest,
    Location, LoginRequest, RegisterRequest, RouteInfo, Transcription, TravelMode,
};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// HTTP Methods for API Requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// GET/DELETE 请求不携带请求体
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put)
    }
}

/// A trait that defines the request-response relationship and metadata for an API endpoint.
///
/// 请求体即 `Self` 的 JSON 序列化结果（仅 POST/PUT），路径参数用 `#[serde(skip)]` 排除。
pub trait ApiRequest: Serialize {
    /// The response type returned by this request.
    type Response: DeserializeOwned;
    /// The HTTP method.
    const METHOD: HttpMethod;

    /// The URL path relative to the API base.
    fn path(&self) -> String;

    /// Query string parameters, in order.
    fn query(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// =========================================================
// 行程 (Itinerary)
// =========================================================

impl ApiRequest for ItineraryRequest {
    type Response = Itinerary;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/itineraries/".to_string()
    }
}

impl ApiRequest for ItineraryTextRequest {
    type Response = ItineraryFromText;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/itineraries/from-text".to_string()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListItinerariesRequest {
    pub limit: u32,
}

impl ApiRequest for ListItinerariesRequest {
    type Response = Vec<Itinerary>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/itineraries/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        vec![("limit", self.limit.to_string())]
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetItineraryRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetItineraryRequest {
    type Response = Itinerary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/itineraries/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteItineraryRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteItineraryRequest {
    type Response = (); // 204 No Content
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/itineraries/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetStatusRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for BudgetStatusRequest {
    type Response = BudgetStatus;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/itineraries/{}/budget-status", self.id)
    }
}

// =========================================================
// 开销 (Expense)
// =========================================================

impl ApiRequest for ExpenseCreate {
    type Response = Expense;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/expenses/".to_string()
    }
}

impl ApiRequest for ExpenseQuery {
    type Response = Vec<Expense>;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/expenses/".to_string()
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(id) = &self.itinerary_id {
            params.push(("itinerary_id", id.clone()));
        }
        if let Some(category) = self.category {
            params.push(("category", category.as_str().to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        params
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GetExpenseRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for GetExpenseRequest {
    type Response = Expense;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        format!("/expenses/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateExpenseRequest {
    #[serde(skip)]
    pub id: String,
    #[serde(flatten)]
    pub changes: ExpenseUpdate,
}

impl ApiRequest for UpdateExpenseRequest {
    type Response = Expense;
    const METHOD: HttpMethod = HttpMethod::Put;

    fn path(&self) -> String {
        format!("/expenses/{}", self.id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteExpenseRequest {
    #[serde(skip)]
    pub id: String,
}

impl ApiRequest for DeleteExpenseRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;

    fn path(&self) -> String {
        format!("/expenses/{}", self.id)
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ExpenseSummaryRequest {
    pub itinerary_id: Option<String>,
}

impl ApiRequest for ExpenseSummaryRequest {
    type Response = ExpenseSummary;
    const METHOD: HttpMethod = HttpMethod::Get;

    fn path(&self) -> String {
        "/expenses/summary".to_string()
    }

    /// 空 id 等同于未指定，汇总全部消费
    fn query(&self) -> Vec<(&'static str, String)> {
        match &self.itinerary_id {
            Some(id) if !id.is_empty() => vec![("itinerary_id", id.clone())],
            _ => Vec::new(),
        }
    }
}

// =========================================================
// 导航 (Navigation)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchLocationRequest {
    pub query: String,
    pub city: Option<String>,
}

impl ApiRequest for SearchLocationRequest {
    type Response = Vec<Location>;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/navigation/search".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteRequest {
    pub origin: String,
    pub destination: String,
    pub mode: TravelMode,
}

impl ApiRequest for RouteRequest {
    type Response = RouteInfo;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/navigation/route".to_string()
    }
}

// =========================================================
// 语音 (Voice)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizeSpeechRequest {
    /// Base64 编码的音频
    pub audio_data: String,
    pub language: String,
}

impl ApiRequest for RecognizeSpeechRequest {
    type Response = Transcription;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/voice/recognize".to_string()
    }
}

/// 语音上传走 multipart，不经过 `ApiRequest`，只在此登记路径
pub const VOICE_UPLOAD_PATH: &str = "/voice/upload";

// =========================================================
// 认证 (Auth)
// =========================================================

impl ApiRequest for RegisterRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/register".to_string()
    }
}

impl ApiRequest for LoginRequest {
    type Response = AuthResponse;
    const METHOD: HttpMethod = HttpMethod::Post;

    fn path(&self) -> String {
        "/auth/login".to_string()
    }
}
