//! 出卷流程 - 流程层
//!
//! 核心职责：定义"一份试卷"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验请求 → 构建提示词
//! 2. 调用生成服务（超时 + 重试）
//! 3. 切分题目/答案（失败降级为占位文本）
//! 4. 并行渲染两份 PDF

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::{sleep, timeout};
use tracing::{error, info, warn};

use crate::clients::QuestionGenerator;
use crate::config::Config;
use crate::error::{AppError, AppResult, GenerationError};
use crate::models::{DocumentKind, ExamPrompt};
use crate::services::{render_at, segment_bytes, RenderedDocument};
use crate::utils::logging::truncate_text;
use crate::workflow::exam_ctx::ExamCtx;

/// 两次尝试之间的基础等待时间，第 n 次重试等待 n 倍
const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// 一份渲染好的文档及其下载文件名
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub kind: DocumentKind,
    pub title: String,
    pub file_name: String,
    pub document: RenderedDocument,
}

impl GeneratedDocument {
    /// 写入目录，返回完整路径
    pub async fn write_to(&self, dir: &Path) -> AppResult<PathBuf> {
        let path = dir.join(&self.file_name);
        tokio::fs::write(&path, self.document.as_bytes())
            .await
            .map_err(|e| AppError::file(path.display().to_string(), e))?;
        Ok(path)
    }
}

/// 一次出卷的全部产物
#[derive(Debug, Clone)]
pub struct ExamArtifacts {
    pub questions_text: String,
    pub answers_text: String,
    pub questions: GeneratedDocument,
    pub answers: GeneratedDocument,
    /// 切分是否降级为占位文本
    pub degraded: bool,
}

/// 出卷流程
///
/// - 不持有任何全局状态
/// - 只依赖生成能力（QuestionGenerator）和核心服务
pub struct ExamFlow<G> {
    generator: G,
    attempt_timeout: Duration,
    max_attempts: usize,
    retry_delay: Duration,
}

impl<G: QuestionGenerator> ExamFlow<G> {
    /// 创建新的出卷流程
    pub fn new(generator: G, config: &Config) -> Self {
        Self {
            generator,
            attempt_timeout: Duration::from_secs(config.generation_timeout_secs.max(1)),
            max_attempts: config.generation_max_retries.max(1),
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    pub fn with_attempt_timeout(mut self, attempt_timeout: Duration) -> Self {
        self.attempt_timeout = attempt_timeout;
        self
    }

    pub async fn run(&self, ctx: &ExamCtx) -> AppResult<ExamArtifacts> {
        ctx.request.validate()?;
        let prompt = ctx.request.prompt();

        // ========== 1. 生成 ==========
        info!("{} 📝 正在生成试题...", ctx);
        let raw = self.generate_with_retry(ctx, &prompt).await?;
        info!(
            "{} ✓ 生成完成 ({} 字节): {}",
            ctx,
            raw.len(),
            truncate_text(&String::from_utf8_lossy(&raw), 60)
        );

        // ========== 2. 切分 ==========
        let segmentation = segment_bytes(&raw);
        let degraded = segmentation.is_placeholder();
        if degraded {
            warn!("{} ⚠️ 切分失败，文档将使用占位文本", ctx);
        }
        let (questions_text, answers_text) = segmentation.into_parts();

        // ========== 3. 渲染 ==========
        info!("{} 🖨️ 正在渲染 PDF...", ctx);
        let (questions, answers) =
            self.render_both(ctx, &questions_text, &answers_text).await?;
        info!(
            "{} ✓ 渲染完成: 题目 {} 页, 答案 {} 页",
            ctx,
            questions.document.page_count(),
            answers.document.page_count()
        );

        Ok(ExamArtifacts {
            questions_text,
            answers_text,
            questions,
            answers,
            degraded,
        })
    }

    /// 调用生成服务，每次尝试单独计时
    async fn generate_with_retry(
        &self,
        ctx: &ExamCtx,
        prompt: &ExamPrompt,
    ) -> Result<Vec<u8>, GenerationError> {
        let endpoint = self.generator.endpoint().to_string();
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            if attempt > 1 {
                let delay = self.retry_delay * (attempt as u32 - 1);
                info!(
                    "{} 🔁 {:?} 后进行第 {}/{} 次尝试",
                    ctx, delay, attempt, self.max_attempts
                );
                sleep(delay).await;
            }

            let error = match timeout(self.attempt_timeout, self.generator.generate(prompt)).await {
                Ok(Ok(raw)) => return Ok(raw),
                Ok(Err(e)) if !e.is_retryable() => {
                    error!("{} ❌ 生成服务返回无法重试的错误: {}", ctx, e);
                    return Err(e);
                }
                Ok(Err(e)) => e,
                Err(_) => GenerationError::Timeout {
                    endpoint: endpoint.clone(),
                    secs: self.attempt_timeout.as_secs(),
                },
            };

            warn!(
                "{} ⚠️ 第 {}/{} 次生成失败: {}",
                ctx, attempt, self.max_attempts, error
            );
            last_error = Some(error);
        }

        Err(last_error.unwrap_or(GenerationError::EmptyResponse { endpoint }))
    }

    /// 在阻塞线程池中并行渲染两份文档
    async fn render_both(
        &self,
        ctx: &ExamCtx,
        questions_text: &str,
        answers_text: &str,
    ) -> AppResult<(GeneratedDocument, GeneratedDocument)> {
        let spawn = |kind: DocumentKind, content: &str| {
            let title = ctx.request.title(kind);
            let content = content.to_string();
            let generated_at = ctx.generated_at;
            let task_title = title.clone();
            let handle = tokio::task::spawn_blocking(move || {
                render_at(&content, &task_title, generated_at)
            });
            (kind, title, handle)
        };

        let (q_kind, q_title, q_handle) = spawn(DocumentKind::Questions, questions_text);
        let (a_kind, a_title, a_handle) = spawn(DocumentKind::Answers, answers_text);

        let (q_result, a_result) = futures::future::try_join(q_handle, a_handle).await?;
        let date = ctx.generated_at.date();

        let questions = GeneratedDocument {
            kind: q_kind,
            file_name: ctx.request.file_name(q_kind, date),
            title: q_title,
            document: q_result?,
        };
        let answers = GeneratedDocument {
            kind: a_kind,
            file_name: ctx.request.file_name(a_kind, date),
            title: a_title,
            document: a_result?,
        };
        Ok((questions, answers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ClassLevel, ExamRequest, Subject};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// 按顺序返回预设结果的生成器
    struct Scripted {
        replies: Mutex<Vec<Result<Vec<u8>, GenerationError>>>,
        calls: AtomicUsize,
    }

    impl Scripted {
        fn new(mut replies: Vec<Result<Vec<u8>, GenerationError>>) -> Self {
            replies.reverse();
            Self {
                replies: Mutex::new(replies),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl QuestionGenerator for Scripted {
        fn endpoint(&self) -> &str {
            "scripted"
        }

        async fn generate(&self, _prompt: &ExamPrompt) -> Result<Vec<u8>, GenerationError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.replies.lock().unwrap().pop();
            next.unwrap_or(Err(GenerationError::EmptyResponse {
                endpoint: "scripted".to_string(),
            }))
        }
    }

    fn flow(replies: Vec<Result<Vec<u8>, GenerationError>>) -> ExamFlow<Scripted> {
        ExamFlow::new(Scripted::new(replies), &Config::default())
            .with_retry_delay(Duration::from_millis(1))
    }

    fn ctx() -> ExamCtx {
        ExamCtx::new(ExamRequest::new(ClassLevel::Form2, Subject::Biology), None)
    }

    fn unavailable() -> GenerationError {
        GenerationError::BadStatus {
            endpoint: "scripted".to_string(),
            status: 503,
        }
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let flow = flow(vec![
            Err(unavailable()),
            Ok(b"1. Q?\nA. a\nCorrect answer: A".to_vec()),
        ]);
        let artifacts = flow.run(&ctx()).await.unwrap();

        assert_eq!(flow.generator.calls.load(Ordering::SeqCst), 2);
        assert!(artifacts.questions_text.ends_with("1. Q?\nA. a"));
        assert!(artifacts.answers_text.ends_with("Correct answer: A"));
        assert!(!artifacts.degraded);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_attempts() {
        let flow = flow(vec![Err(unavailable()), Err(unavailable()), Err(unavailable())]);
        let err = flow.run(&ctx()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation(GenerationError::BadStatus { status: 503, .. })
        ));
        assert_eq!(flow.generator.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_malformed_response_is_not_retried() {
        let flow = flow(vec![Err(GenerationError::malformed("scripted", "bad json"))]);
        assert!(flow.run(&ctx()).await.is_err());
        assert_eq!(flow.generator.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_invalid_request_never_calls_generator() {
        let flow = flow(vec![]);
        let bad = ExamCtx::new(
            ExamRequest::new(ClassLevel::Form1, Subject::Music).with_num_questions(1),
            None,
        );
        assert!(matches!(
            flow.run(&bad).await,
            Err(AppError::Request(_))
        ));
        assert_eq!(flow.generator.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_undecodable_text_degrades_but_still_renders() {
        let flow = flow(vec![Ok(b"1. Q\xff\n".to_vec())]);
        let artifacts = flow.run(&ctx()).await.unwrap();

        assert!(artifacts.degraded);
        assert_eq!(artifacts.questions_text, "Error processing questions");
        assert_eq!(artifacts.answers_text, "Error processing answers");
        assert!(artifacts.questions.document.as_bytes().starts_with(b"%PDF"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_generator_times_out() {
        struct Slow;

        impl QuestionGenerator for Slow {
            fn endpoint(&self) -> &str {
                "slow"
            }

            async fn generate(&self, _prompt: &ExamPrompt) -> Result<Vec<u8>, GenerationError> {
                sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
        }

        let flow = ExamFlow::new(Slow, &Config::default())
            .with_attempt_timeout(Duration::from_secs(5))
            .with_retry_delay(Duration::from_millis(1));
        let err = flow.run(&ctx()).await.unwrap_err();

        assert!(matches!(
            err,
            AppError::Generation(GenerationError::Timeout { secs: 5, .. })
        ));
    }
}
