use std::sync::Arc;

use leptos::prelude::*;
use travel_planner_shared::{Expense, ExpenseCreate, ExpenseQuery, ExpenseSummary, ExpenseUpdate};

use super::{ActionState, run_action};
use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::HttpClient;
use crate::web::KeyValueStorage;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseState {
    pub expenses: Vec<Expense>,
    pub summary: Option<ExpenseSummary>,
    pub loading: bool,
    pub error: Option<String>,
}

impl ActionState for ExpenseState {
    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }

    fn set_error(&mut self, error: Option<String>) {
        self.error = error;
    }
}

pub struct ExpenseStore<C, S> {
    state: ArcRwSignal<ExpenseState>,
    api: Arc<ApiClient<C, S>>,
}

impl<C, S> Clone for ExpenseStore<C, S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            api: self.api.clone(),
        }
    }
}

impl<C: HttpClient, S: KeyValueStorage> ExpenseStore<C, S> {
    pub fn new(api: Arc<ApiClient<C, S>>) -> Self {
        Self {
            state: ArcRwSignal::new(ExpenseState::default()),
            api,
        }
    }

    pub fn state(&self) -> ArcRwSignal<ExpenseState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> ExpenseState {
        self.state.get_untracked()
    }

    // 并发调用时后返回的响应会覆盖先返回的
    pub async fn fetch_expenses(&self, params: &ExpenseQuery) {
        let _ = run_action(
            &self.state,
            "fetching expenses",
            self.api.expenses().get_expenses(params),
            |s, list: &Vec<Expense>| s.expenses = list.clone(),
        )
        .await;
    }

    pub async fn create_expense(&self, data: &ExpenseCreate) -> ClientResult<Expense> {
        run_action(
            &self.state,
            "creating expense",
            self.api.expenses().create_expense(data),
            |s, created: &Expense| s.expenses.insert(0, created.clone()),
        )
        .await
    }

    /// 按 id 原位替换；列表中没有该 id 时只返回结果
    pub async fn update_expense(&self, id: &str, data: &ExpenseUpdate) -> ClientResult<Expense> {
        run_action(
            &self.state,
            "updating expense",
            self.api.expenses().update_expense(id, data),
            |s, updated: &Expense| {
                if let Some(slot) = s.expenses.iter_mut().find(|e| e.id == id) {
                    *slot = updated.clone();
                }
            },
        )
        .await
    }

    pub async fn delete_expense(&self, id: &str) -> ClientResult<()> {
        run_action(
            &self.state,
            "deleting expense",
            self.api.expenses().delete_expense(id),
            |s, _: &()| s.expenses.retain(|e| e.id != id),
        )
        .await
    }

    pub async fn fetch_expense_summary(&self, itinerary_id: Option<&str>) {
        let _ = run_action(
            &self.state,
            "fetching expense summary",
            self.api.expenses().get_expense_summary(itinerary_id),
            |s, summary: &ExpenseSummary| s.summary = Some(summary.clone()),
        )
        .await;
    }
}
