//! 语音输入 store
//!
//! 只维护录音/转写状态，不发请求。识别由 `VoiceService` 完成后
//! 调用方把结果写回这里。

use leptos::prelude::*;
use travel_planner_shared::date::Timestamp;

/// 已完成的一条转写记录
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub text: String,
    /// ISO 8601 时间
    pub timestamp: String,
    pub intent: Option<String>,
}

/// `finalize_transcript` 的输入，时间与意图可缺省
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FinalizedTranscript {
    pub text: String,
    pub timestamp: Option<String>,
    pub intent: Option<String>,
}

impl FinalizedTranscript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceState {
    pub is_recording: bool,
    /// 当前（未完成的）转写文本
    pub transcript: String,
    /// 最新的记录在最前
    pub history: Vec<TranscriptEntry>,
    pub error: Option<String>,
}

#[derive(Clone)]
pub struct VoiceStore {
    state: ArcRwSignal<VoiceState>,
}

impl Default for VoiceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl VoiceStore {
    pub fn new() -> Self {
        Self {
            state: ArcRwSignal::new(VoiceState::default()),
        }
    }

    pub fn state(&self) -> ArcRwSignal<VoiceState> {
        self.state.clone()
    }

    pub fn snapshot(&self) -> VoiceState {
        self.state.get_untracked()
    }

    /// 开始录音，清空上一段转写与错误
    pub fn start_recording(&self) {
        self.state.update(|s| {
            s.is_recording = true;
            s.transcript.clear();
            s.error = None;
        });
    }

    pub fn stop_recording(&self) {
        self.state.update(|s| s.is_recording = false);
    }

    /// 追加一段识别片段
    pub fn append_transcript(&self, chunk: &str) {
        self.state.update(|s| {
            let joined = format!("{}{}", s.transcript, chunk);
            s.transcript = joined.trim().to_string();
        });
    }

    pub fn finalize_transcript(&self, entry: FinalizedTranscript) {
        let timestamp = entry
            .timestamp
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| Timestamp::now().to_iso_string());
        let intent = entry.intent.filter(|i| !i.is_empty());

        self.state.update(|s| {
            s.transcript = entry.text.clone();
            s.history.insert(
                0,
                TranscriptEntry {
                    text: entry.text,
                    timestamp,
                    intent,
                },
            );
        });
    }

    /// 记录错误并停止录音
    pub fn set_error(&self, message: Option<String>) {
        if let Some(msg) = &message {
            log_warn!("[Voice] {}", msg);
        }
        self.state.update(|s| {
            s.error = message;
            s.is_recording = false;
        });
    }

    /// 回到初始状态，保留历史记录
    pub fn reset(&self) {
        self.state.update(|s| {
            s.is_recording = false;
            s.transcript.clear();
            s.error = None;
        });
    }
}
