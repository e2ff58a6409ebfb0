/// OpenAI 兼容接口客户端
///
/// 使用 `async-openai`，支持自定义 API 端点和模型
use crate::clients::generation::{non_empty, QuestionGenerator};
use crate::config::Config;
use crate::error::GenerationError;
use crate::models::ExamPrompt;
use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
    Client,
};
use tracing::{debug, warn};

/// 生成 50 道题时的输出长度上限
const MAX_TOKENS: u32 = 8192;

pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
    api_base_url: String,
    model_name: String,
}

impl OpenAiClient {
    /// 创建新的 OpenAI 客户端
    pub fn new(config: &Config) -> Self {
        let openai_config = OpenAIConfig::new()
            .with_api_key(&config.generation_api_key)
            .with_api_base(config.api_url());

        Self {
            client: Client::with_config(openai_config),
            api_base_url: config.api_url().to_string(),
            model_name: config.generation_model.clone(),
        }
    }

    fn build_messages(
        &self,
        prompt: &ExamPrompt,
    ) -> Result<Vec<ChatCompletionRequestMessage>, GenerationError> {
        let system = ChatCompletionRequestSystemMessageArgs::default()
            .content(prompt.system.as_str())
            .build()
            .map_err(|e| GenerationError::request_failed(&self.api_base_url, e))?;
        let user = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt.user.as_str())
            .build()
            .map_err(|e| GenerationError::request_failed(&self.api_base_url, e))?;

        Ok(vec![
            ChatCompletionRequestMessage::System(system),
            ChatCompletionRequestMessage::User(user),
        ])
    }
}

impl QuestionGenerator for OpenAiClient {
    fn endpoint(&self) -> &str {
        &self.api_base_url
    }

    async fn generate(&self, prompt: &ExamPrompt) -> Result<Vec<u8>, GenerationError> {
        debug!("调用 LLM API，模型: {}", self.model_name);

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model_name)
            .messages(self.build_messages(prompt)?)
            .temperature(0.7)
            .max_tokens(MAX_TOKENS)
            .build()
            .map_err(|e| GenerationError::request_failed(&self.api_base_url, e))?;

        let response = self.client.chat().create(request).await.map_err(|e| {
            warn!("LLM API 调用失败: {}", e);
            GenerationError::request_failed(&self.api_base_url, e)
        })?;

        debug!("LLM API 调用成功");

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or_else(|| GenerationError::EmptyResponse {
                endpoint: self.api_base_url.clone(),
            })?;

        non_empty(&self.api_base_url, content)
    }
}
