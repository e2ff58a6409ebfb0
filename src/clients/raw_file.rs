/// 离线生成源：直接读取事先保存的生成结果
use crate::clients::generation::QuestionGenerator;
use crate::error::GenerationError;
use crate::models::ExamPrompt;
use tracing::debug;

pub struct RawTextFile {
    path: String,
}

impl RawTextFile {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl QuestionGenerator for RawTextFile {
    fn endpoint(&self) -> &str {
        &self.path
    }

    async fn generate(&self, _prompt: &ExamPrompt) -> Result<Vec<u8>, GenerationError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| GenerationError::request_failed(&self.path, e))?;
        debug!("读取离线文本: {} ({} 字节)", self.path, bytes.len());

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(GenerationError::EmptyResponse {
                endpoint: self.path.clone(),
            });
        }
        Ok(bytes)
    }
}
