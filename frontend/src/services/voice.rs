use travel_planner_shared::protocol::{HttpMethod, RecognizeSpeechRequest, VOICE_UPLOAD_PATH};
use travel_planner_shared::{AudioFile, Transcription};

use crate::api::ApiClient;
use crate::error::ClientResult;
use crate::transport::{FormPart, HttpClient, RequestBody};
use crate::web::KeyValueStorage;

pub struct VoiceService<'a, C, S> {
    api: &'a ApiClient<C, S>,
}

impl<'a, C: HttpClient, S: KeyValueStorage> VoiceService<'a, C, S> {
    pub(crate) fn new(api: &'a ApiClient<C, S>) -> Self {
        Self { api }
    }

    /// 识别 Base64 编码的音频
    pub async fn recognize_speech(
        &self,
        audio_data: &str,
        language: &str,
    ) -> ClientResult<Transcription> {
        self.api
            .call(&RecognizeSpeechRequest {
                audio_data: audio_data.to_string(),
                language: language.to_string(),
            })
            .await
    }

    /// 上传录音文件转写（multipart: `file` + `language`）
    pub async fn upload_voice(&self, file: &AudioFile, language: &str) -> ClientResult<Transcription> {
        let form = vec![
            FormPart::File {
                name: "file".to_string(),
                file_name: file.file_name.clone(),
                content_type: file.content_type.clone(),
                bytes: file.bytes.clone(),
            },
            FormPart::Text {
                name: "language".to_string(),
                value: language.to_string(),
            },
        ];

        self.api
            .request(
                HttpMethod::Post,
                VOICE_UPLOAD_PATH,
                Some(RequestBody::Multipart(form)),
                &[],
                &[],
            )
            .await
    }
}
