//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：读取配置、构建出卷上下文
//! 2. **选择生成源**：离线文件 / RapidAPI / OpenAI 兼容接口
//! 3. **执行流程**：委托 `ExamFlow` 完成生成、切分、渲染
//! 4. **输出文件**：把两份 PDF 写入输出目录并打印统计

use crate::clients::{OpenAiClient, QuestionGenerator, RapidApiClient, RawTextFile};
use crate::config::{Config, Provider};
use crate::error::{AppError, AppResult};
use crate::utils::logging::{log_startup, print_final_stats};
use crate::workflow::{ExamArtifacts, ExamCtx, ExamFlow};
use std::path::{Path, PathBuf};
use tracing::info;

/// 一次运行写出的文件
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub questions_path: PathBuf,
    pub answers_path: PathBuf,
    pub artifacts: ExamArtifacts,
}

/// 应用主结构
pub struct App {
    config: Config,
    ctx: ExamCtx,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> AppResult<Self> {
        let request = config.exam_request()?;
        let ctx = ExamCtx::new(request, config.requested_by.clone());

        log_startup(&config, &ctx);

        Ok(Self { config, ctx })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> AppResult<RunOutput> {
        match (&self.config.raw_text_file, self.config.generation_provider) {
            (Some(path), _) => self.run_with(RawTextFile::new(path.clone())).await,
            (None, Provider::RapidApi) => self.run_with(RapidApiClient::new(&self.config)?).await,
            (None, Provider::OpenAi) => self.run_with(OpenAiClient::new(&self.config)).await,
        }
    }

    async fn run_with<G: QuestionGenerator>(&self, generator: G) -> AppResult<RunOutput> {
        let flow = ExamFlow::new(generator, &self.config);
        let artifacts = flow.run(&self.ctx).await?;

        let dir = Path::new(&self.config.output_dir);
        info!("\n📁 正在写入输出目录: {}", dir.display());
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::file(dir.display().to_string(), e))?;

        let questions_path = artifacts.questions.write_to(dir).await?;
        let answers_path = artifacts.answers.write_to(dir).await?;

        print_final_stats(&artifacts, &questions_path, &answers_path);

        Ok(RunOutput {
            questions_path,
            answers_path,
            artifacts,
        })
    }
}
