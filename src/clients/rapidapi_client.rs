/// RapidAPI 生成服务客户端
///
/// 请求体是消息数组 `[{content, role}, ...]`，成功时返回 `{"text": "..."}`
use crate::clients::generation::{non_empty, QuestionGenerator};
use crate::config::Config;
use crate::error::GenerationError;
use crate::models::ExamPrompt;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, warn};

pub struct RapidApiClient {
    http: reqwest::Client,
    url: String,
    api_key: String,
    api_host: String,
}

impl RapidApiClient {
    /// 创建新的 RapidAPI 客户端
    pub fn new(config: &Config) -> Result<Self, GenerationError> {
        let url = config.api_url().to_string();
        let http = reqwest::Client::builder()
            .build()
            .map_err(|e| GenerationError::request_failed(&url, e))?;

        Ok(Self {
            http,
            url,
            api_key: config.generation_api_key.clone(),
            api_host: config.generation_api_host.clone(),
        })
    }
}

impl QuestionGenerator for RapidApiClient {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn generate(&self, prompt: &ExamPrompt) -> Result<Vec<u8>, GenerationError> {
        debug!("调用 RapidAPI: {}", self.url);

        let response = self
            .http
            .post(&self.url)
            .header("x-rapidapi-key", &self.api_key)
            .header("x-rapidapi-host", &self.api_host)
            .json(&prompt.messages())
            .send()
            .await
            .map_err(|e| GenerationError::request_failed(&self.url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            warn!("RapidAPI 返回错误状态: {}", status);
            return Err(GenerationError::BadStatus {
                endpoint: self.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| GenerationError::request_failed(&self.url, e))?;

        debug!("RapidAPI 响应长度: {} 字节", body.len());
        extract_text(&self.url, &body)
    }
}

/// 从响应体中取出 `text` 字段
fn extract_text(endpoint: &str, body: &[u8]) -> Result<Vec<u8>, GenerationError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| GenerationError::malformed(endpoint, e))?;

    match value.get("text") {
        Some(Value::String(text)) => non_empty(endpoint, text.clone()),
        Some(other) => Err(GenerationError::malformed(
            endpoint,
            format!("text 字段不是字符串: {}", other),
        )),
        None => Err(GenerationError::malformed(endpoint, "响应中没有 text 字段")),
    }
}
