//! 状态 store
//!
//! 每个 store 持有一个 `ArcRwSignal` 状态与共享的 API 客户端，
//! 由 `App` 创建后通过 Context 提供给视图。
//!
//! 异步动作统一走 [`run_action`]：开始时 `loading = true` 并清空 `error`，
//! 结束时无论成败都复位 `loading`，失败时记录错误消息。
//! 读取类动作吞掉错误，增删改动作把错误返回给调用方。

use std::future::Future;

use leptos::prelude::*;

use crate::error::ClientResult;

mod expense;
mod itinerary;
mod user;
mod voice;

pub use expense::{ExpenseState, ExpenseStore};
pub use itinerary::{ItineraryState, ItineraryStore};
pub use user::{UserState, UserStore};
pub use voice::{FinalizedTranscript, TranscriptEntry, VoiceState, VoiceStore};

/// 带 `loading` / `error` 字段的状态
pub(crate) trait ActionState {
    fn set_loading(&mut self, loading: bool);
    fn set_error(&mut self, error: Option<String>);
}

/// 执行一次 store 动作
///
/// `apply` 在成功时与 `loading` 复位处于同一次状态更新中。
pub(crate) async fn run_action<S, T, F>(
    state: &ArcRwSignal<S>,
    action: &str,
    call: F,
    apply: impl FnOnce(&mut S, &T),
) -> ClientResult<T>
where
    S: ActionState + 'static,
    F: Future<Output = ClientResult<T>>,
{
    state.update(|s| {
        s.set_loading(true);
        s.set_error(None);
    });

    let result = call.await;

    state.update(|s| {
        match &result {
            Ok(value) => apply(s, value),
            Err(e) => s.set_error(Some(e.to_string())),
        }
        s.set_loading(false);
    });

    if let Err(e) = &result {
        log_error!("Error {}: {}", action, e);
    }

    result
}
