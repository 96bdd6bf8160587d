//! 资源服务层
//!
//! 每个方法对应一次 REST 调用：拼接路径、原样转发参数、返回解析后的响应体。
//! 通过 `ApiClient::itineraries()` 等方法获取。

mod expense;
mod itinerary;
mod navigation;
mod user;
mod voice;

pub use expense::ExpenseService;
pub use itinerary::ItineraryService;
pub use navigation::NavigationService;
pub use user::AuthService;
pub use voice::VoiceService;
