use std::sync::Arc;

use leptos::prelude::*;
use travel_planner_shared::{
    BudgetStatus, DEFAULT_ITINERARY_LIMIT, Itinerary, ItineraryFromText, ItineraryRequest,
    ItineraryTextRequest,
};

use super::{ActionState, run_action};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ItineraryState {
    pub itineraries: Vec<Itinerary>,
    pub current_itinerary: Option<Itinerary>,
    pub budget_status: Option<BudgetStatus>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ActionState for ItineraryState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct ItineraryStore<C, S> {
    state: ArcRwSignal<ItineraryState>,
    api: Arc<ApiClient<C, S>>,
}

impl<C, S> Clone for ItineraryStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> ItineraryStore<C, S> {
    pub fn new(api: Arc<ApiClient<C, S>>) -> Self {
        Self {
            state: ArcRwSignal::new(ItineraryState::default()),
            api,
        }
    }

    /// 响应式状态，供视图订阅
    pub fn state(&self) -> ArcRwSignal<ItineraryState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> ItineraryState {
        self.state.get_untracked()
    }

    pub async fn fetch_itineraries(&self) {
        let _ = run_action(
            &self.state,
            "fetching itineraries",
            self.api.itineraries().get_itineraries(DEFAULT_ITINERARY_LIMIT),
            |s, list: &Vec<Itinerary>| s.itineraries = list.clone(),
        )
        .await;
    }

    /// 新行程插入列表头部
    pub async fn create_itinerary(&self, data: &ItineraryRequest) -> ClientResult<Itinerary> {
        run_action(
            &self.state,
            "creating itinerary",
            self.api.itineraries().create_itinerary(data),
            |s, created: &Itinerary| s.itineraries.insert(0, created.clone()),
        )
        .await
    }

    pub async fn create_itinerary_from_text(
        &self,
        data: &ItineraryTextRequest,
    ) -> ClientResult<ItineraryFromText> {
        run_action(
            &self.state,
            "creating itinerary from text",
            self.api.itineraries().create_itinerary_from_text(data),
            |s, generated: &ItineraryFromText| {
                s.itineraries.insert(0, generated.itinerary.clone())
            },
        )
        .await
    }

    pub async fn fetch_itinerary(&self, id: &str) {
        let _ = run_action(
            &self.state,
            "fetching itinerary",
            self.api.itineraries().get_itinerary(id),
            |s, itinerary: &Itinerary| s.current_itinerary = Some(itinerary.clone()),
        )
        .await;
    }

    pub async fn fetch_budget_status(&self, id: &str) {
        let _ = run_action(
            &self.state,
            "fetching budget status",
            self.api.itineraries().get_budget_status(id),
            |s, status: &BudgetStatus| s.budget_status = Some(status.clone()),
        )
        .await;
    }

    /// 删除成功后按 id 移除，其余元素顺序不变
    pub async fn delete_itinerary(&self, id: &str) -> ClientResult<()> {
        run_action(
            &self.state,
            "deleting itinerary",
            self.api.itineraries().delete_itinerary(id),
            |s, _: &()| s.itineraries.retain(|i| !i.has_id(id)),
        )
        .await
    }
}

#[cfg(test)]
mod tests;
