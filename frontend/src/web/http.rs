//! HTTP 请求封装模块
//!
//! 基于 `gloo-net` 的浏览器 fetch 实现，负责把通用 `HttpRequest` 翻译为真实请求。

use gloo_net::http::{Request, RequestBuilder};
use travel_planner_shared::protocol::HttpMethod;
use wasm_bindgen::JsValue;
use web_sys::{Blob, BlobPropertyBag, FormData};

use crate::error::{ClientError, ClientResult};
use crate::transport::{FormPart, HttpClient, HttpRequest, HttpResponse, RequestBody};

/// 构建 multipart 表单（文件以 Blob 形式附加）
fn build_form(parts: &[FormPart]) -> Result<FormData, JsValue> {
    let form = FormData::new()?;
    for part in parts {
        match part {
            FormPart::Text { name, value } => form.append_with_str(name, value)?,
            FormPart::File {
                name,
                file_name,
                content_type,
                bytes,
            } => {
                let chunks = js_sys::Array::new();
                chunks.push(&js_sys::Uint8Array::from(bytes.as_slice()));
                let options = BlobPropertyBag::new();
                options.set_type(content_type);
                let blob = Blob::new_with_u8_array_sequence_and_options(&chunks, &options)?;
                form.append_with_blob_and_filename(name, &blob, file_name)?;
            }
        }
    }
    Ok(form)
}

fn builder(req: &HttpRequest) -> RequestBuilder {
    let mut builder = match req.method {
        HttpMethod::Get => Request::get(&req.url),
        HttpMethod::Post => Request::post(&req.url),
        HttpMethod::Put => Request::put(&req.url),
        HttpMethod::Delete => Request::delete(&req.url),
    };

    for (key, value) in &req.headers {
        builder = builder.header(key, value);
    }

    if !req.query.is_empty() {
        builder = builder.query(req.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }

    builder
}

/// 浏览器 fetch 客户端
#[derive(Debug, Clone, Copy, Default)]
pub struct FetchHttpClient;

#[async_trait::async_trait(?Send)]
impl HttpClient for FetchHttpClient {
    async fn send(&self, req: HttpRequest) -> ClientResult<HttpResponse> {
        let builder = builder(&req);

        let request = match &req.body {
            None => builder.build(),
            Some(RequestBody::Json(json)) => builder
                .header("Content-Type", "application/json")
                .body(json.as_str()),
            // Content-Type 交由浏览器填写 boundary
            Some(RequestBody::Multipart(parts)) => {
                let form = build_form(parts)
                    .map_err(|e| ClientError::Request(format!("构建表单失败: {:?}", e)))?;
                builder.body(form)
            }
        }
        .map_err(|e| ClientError::Request(e.to_string()))?;

        let response = request
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        Ok(HttpResponse { status, body })
    }
}
