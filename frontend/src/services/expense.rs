use travel_planner_shared::protocol::{
    DeleteExpenseRequest, ExpenseSummaryRequest, GetExpenseRequest, UpdateExpenseRequest,
};
use travel_planner_shared::{Expense, ExpenseCreate, ExpenseQuery, ExpenseSummary, ExpenseUpdate};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

pub struct ExpenseService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> ExpenseService<'a, C, S> {
    pub(crate) fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    pub async fn create_expense(&self, data: &ExpenseCreate) -> ClientResult<Expense> {
        self.api.call(data).await
    }

    /// 过滤条件原样作为查询参数
    pub async fn get_expenses(&self, params: &ExpenseQuery) -> ClientResult<Vec<Expense>> {
        self.api.call(params).await
    }

    pub async fn get_expense(&self, id: &str) -> ClientResult<Expense> {
        self.api.call(&GetExpenseRequest { id: id.to_string() }).await
    }

    pub async fn update_expense(&self, id: &str, data: &ExpenseUpdate) -> ClientResult<Expense> {
        self.api
            .call(&UpdateExpenseRequest {
                id: id.to_string(),
                changes: data.clone(),
            })
            .await
    }

    pub async fn delete_expense(&self, id: &str) -> ClientResult<()> {
        self.api
            .call(&DeleteExpenseRequest { id: id.to_string() })
            .await
    }

    /// 按类别汇总，可限定某个行程
    pub async fn get_expense_summary(
        &self,
        itinerary_id: Option<&str>,
    ) -> ClientResult<ExpenseSummary> {
        self.api
            .call(&ExpenseSummaryRequest {
                itinerary_id: itinerary_id.map(str::to_string),
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::tests::{BASE, test_api};
    use crate::transport::RequestBody;
    use serde_json::json;
    use travel_planner_shared::protocol::HttpMethod;
    use travel_planner_shared::{ExpenseCategory, ExpenseQuery, ExpenseUpdate};

    #[tokio::test]
    async fn test_get_expenses_forwards_filters() {
        let api = test_api();
        api.transport()
            .mock_response(HttpMethod::Get, &format!("{BASE}/expenses/"), 200, json!([]));

        let query = ExpenseQuery {
            itinerary_id: Some("itin-1".to_string()),
            category: Some(ExpenseCategory::Transportation),
            limit: Some(50),
        };
        let list = api.expenses().get_expenses(&query).await.unwrap();

        assert!(list.is_empty());
        let req = api.transport().last_request().unwrap();
        assert_eq!(
            req.query,
            vec![
                ("itinerary_id".to_string(), "itin-1".to_string()),
                ("category".to_string(), "transportation".to_string()),
                ("limit".to_string(), "50".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_update_expense_puts_partial_body() {
        let api = test_api();
        api.transport().mock_response(
            HttpMethod::Put,
            &format!("{BASE}/expenses/exp-3"),
            200,
            json!({
                "id": "exp-3",
                "category": "food",
                "amount": 88.0,
                "description": "Hotpot"
            }),
        );

        let changes = ExpenseUpdate {
            amount: Some(88.0),
            ..Default::default()
        };
        let updated = api.expenses().update_expense("exp-3", &changes).await.unwrap();

        assert_eq!(updated.amount, 88.0);
        let req = api.transport().last_request().unwrap();
        match req.body {
            Some(RequestBody::Json(body)) => {
                let value: serde_json::Value = serde_json::from_str(&body).unwrap();
                assert_eq!(value, json!({ "amount": 88.0 }));
            }
            other => panic!("unexpected body: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_summary_with_and_without_itinerary() {
        let api = test_api();
        api.transport().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/expenses/summary"),
            200,
            json!({ "total_expenses": 1500.0, "by_category": { "food": 500.0 }, "count": 15 }),
        );

        let summary = api.expenses().get_expense_summary(None).await.unwrap();
        assert_eq!(summary.count, 15);
        assert!(api.transport().last_request().unwrap().query.is_empty());

        api.expenses().get_expense_summary(Some("itin-2")).await.unwrap();
        assert_eq!(
            api.transport().last_request().unwrap().query,
            vec![("itinerary_id".to_string(), "itin-2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_summary_blank_itinerary_sends_no_filter() {
        let api = test_api();
        api.transport().mock_response(
            HttpMethod::Get,
            &format!("{BASE}/expenses/summary"),
            200,
            json!({ "total_expenses": 0.0, "by_category": {}, "count": 0 }),
        );

        api.expenses().get_expense_summary(Some("")).await.unwrap();

        assert!(api.transport().last_request().unwrap().query.is_empty());
    }
}
