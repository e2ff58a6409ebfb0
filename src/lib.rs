//! # ZecoED Assessment
//!
//! 根据年级和科目自动出卷：调用文本生成服务得到一整段试题，
//! 切分成"题目"和"答案"两份文档，并分别渲染成可打印的 PDF。
//!
//! ## 架构设计
//!
//! ### ① 业务能力层（Services）
//! - `services/segmenter` - 逐行分类，重组题目/答案文本（纯函数）
//! - `services/renderer` - 折行、分页、页眉页脚，输出 PDF 字节流（纯函数）
//!
//! ### ② 客户端（Clients）
//! - `QuestionGenerator` - 生成能力的统一接口
//! - `RapidApiClient` / `OpenAiClient` / `RawTextFile` - 三种生成源
//!
//! ### ③ 流程层（Workflow）
//! - `ExamCtx` - 请求级上下文（请求 + 发起人 + 生成时间）
//! - `ExamFlow` - 流程编排（生成 → 切分 → 渲染）
//!
//! ### ④ 编排层（Orchestration）
//! - `App` - 读取配置、选择生成源、写出文件
//!
//! ## 模块结构

pub mod clients;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::QuestionGenerator;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use models::{ClassLevel, ExamRequest, Paper, Subject};
pub use orchestrator::App;
pub use services::{render, segment, RenderedDocument, SegmentationResult};
pub use workflow::{ExamArtifacts, ExamCtx, ExamFlow};
