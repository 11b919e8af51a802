/// Gemini API 客户端
///
/// 调用 `models/{model}:generateContent`，从响应信封中取出生成的文本
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::clients::TextGenerator;
use crate::config::Config;
use crate::error::GenerationError;

/// 响应中可能存放文本的位置，按顺序尝试，第一个非空字符串生效
pub const RESPONSE_TEXT_POINTERS: [&str; 3] = [
    "/candidates/0/content/parts/0/text",
    "/contents/0/parts/0/text",
    "/parts/0/text",
];

/// Gemini 客户端
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    api_base_url: String,
    model_name: String,
}

impl GeminiClient {
    /// 创建新的 Gemini 客户端
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(GenerationError::request_failed)?;

        Ok(Self {
            http,
            api_key: config.llm_api_key.clone(),
            api_base_url: config.llm_api_base_url.clone(),
            model_name: config.llm_model_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.api_base_url.trim_end_matches('/'),
            self.model_name
        )
    }

    async fn send(&self, prompt: &str) -> Result<String, GenerationError> {
        debug!("调用 Gemini API，模型: {}", self.model_name);
        debug!("提示词长度: {} 字符", prompt.len());

        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
        });

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", &self.api_key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Gemini API 请求失败: {}", e);
                GenerationError::request_failed(e)
            })?;

        let status = response.status();
        let raw_body = response
            .text()
            .await
            .map_err(GenerationError::request_failed)?;

        interpret_response(status, &raw_body)
    }
}

/// 按状态码和响应体得到生成的文本
///
/// 失败状态优先取 `error.message`，成功但取不到文本时视为格式错误
pub fn interpret_response(status: StatusCode, body: &str) -> Result<String, GenerationError> {
    let data: Option<Value> = serde_json::from_str(body).ok();

    if !status.is_success() {
        warn!("Gemini API 返回错误状态: {}", status);
        return Err(GenerationError::BadStatus {
            status: status.as_u16(),
            message: data.as_ref().and_then(error_message),
        });
    }

    debug!("Gemini API 调用成功");

    let data = data.ok_or(GenerationError::UnexpectedFormat)?;
    extract_generated_text(&data)
        .map(str::to_string)
        .ok_or(GenerationError::UnexpectedFormat)
}

impl TextGenerator for GeminiClient {
    fn generate<'a>(&'a self, prompt: &'a str) -> BoxFuture<'a, Result<String, GenerationError>> {
        self.send(prompt).boxed()
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// 从响应 JSON 中取出生成的文本
pub fn extract_generated_text(data: &Value) -> Option<&str> {
    RESPONSE_TEXT_POINTERS
        .iter()
        .find_map(|pointer| {
            data.pointer(pointer)
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
        })
}

/// 错误响应中的 `error.message`
fn error_message(data: &Value) -> Option<String> {
    data.pointer("/error/message")
        .and_then(Value::as_str)
        .map(str::to_string)
}
