use travel_planner_shared::protocol::{
    BudgetStatusRequest, DeleteItineraryRequest, GetItineraryRequest, ListItinerariesRequest,
};
use travel_planner_shared::{
    BudgetStatus, Itinerary, ItineraryFromText, ItineraryRequest, ItineraryTextRequest,
};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

pub struct ItineraryService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> ItineraryService<'a, C, S> {
    pub(crate) fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    /// 创建行程
    pub async fn create_itinerary(&self, data: &ItineraryRequest) -> ClientResult<Itinerary> {
        self.api.call(data).await
    }

    /// 由自然语言描述生成行程
    pub async fn create_itinerary_from_text(
        &self,
        data: &ItineraryTextRequest,
    ) -> ClientResult<ItineraryFromText> {
        self.api.call(data).await
    }

    /// 获取行程列表
    pub async fn get_itineraries(&self, limit: u32) -> ClientResult<Vec<Itinerary>> {
        self.api.call(&ListItinerariesRequest { limit }).await
    }

    pub async fn get_itinerary(&self, id: &str) -> ClientResult<Itinerary> {
        self.api
            .call(&GetItineraryRequest { id: id.to_string() })
            .await
    }

    pub async fn delete_itinerary(&self, id: &str) -> ClientResult<()> {
        self.api
            .call(&DeleteItineraryRequest { id: id.to_string() })
            .await
    }

    /// 预算执行情况
    pub async fn get_budget_status(&self, id: &str) -> ClientResult<BudgetStatus> {
        self.api
            .call(&BudgetStatusRequest { id: id.to_string() })
            .await
    }
}
