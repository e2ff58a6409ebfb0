//! 题目生成客户端的统一接口

use crate::error::GenerationError;
use crate::models::ExamPrompt;
use std::future::Future;

/// 题目生成能力
///
/// 返回生成服务给出的原始文本（字节形式，编码由切分服务检查）
pub trait QuestionGenerator {
    /// 用于日志和错误信息的端点描述
    fn endpoint(&self) -> &str;

    /// 根据提示词生成一整段试题文本
    fn generate(
        &self,
        prompt: &ExamPrompt,
    ) -> impl Future<Output = Result<Vec<u8>, GenerationError>> + Send;
}

/// 空白内容视为上游没有给出可用结果
pub(crate) fn non_empty(endpoint: &str, text: String) -> Result<Vec<u8>, GenerationError> {
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyResponse {
            endpoint: endpoint.to_string(),
        });
    }
    Ok(text.into_bytes())
}
