//! 编排层（Orchestration Layer）
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (配置 → 上下文 → 输出文件)
//!     ↓
//! workflow::ExamFlow (处理一份试卷)
//!     ↓
//! clients (生成能力) + services (切分 / 渲染)
//! ```
//!
//! 只有编排层读取配置和写文件，下层都是按请求传参。

pub mod app;

pub use app::{App, RunOutput};
