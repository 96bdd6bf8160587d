use travel_planner_shared::protocol::{RouteRequest, SearchLocationRequest};
use travel_planner_shared::{Location, RouteInfo, TravelMode};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

pub struct NavigationService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> NavigationService<'a, C, S> {
    pub(crate) fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    /// 地点搜索
    pub async fn search_location(&self, query: &str, city: Option<&str>) -> ClientResult<Vec<Location>> {
        self.api
            .call(&SearchLocationRequest {
                query: query.to_string(),
                city: city.map(str::to_string),
            })
            .await
    }

    /// 两地之间的路线，默认公共交通
    pub async fn get_route(
        &self,
        origin: &str,
        destination: &str,
        mode: TravelMode,
    ) -> ClientResult<RouteInfo> {
        self.api
            .call(&RouteRequest {
                origin: origin.to_string(),
                destination: destination.to_string(),
                mode,
            })
            .await
    }
}
