/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use crate::config::Config;
use crate::workflow::{ExamArtifacts, ExamCtx};
use std::path::Path;
use tracing::info;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 配置
/// - `ctx`: 本次出卷上下文
pub fn log_startup(config: &Config, ctx: &ExamCtx) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - ZecoED 出卷");
    info!("{} 题目数量: {}", ctx, ctx.request.num_questions);
    info!("{} 考试时长: {} 分钟", ctx, ctx.request.time_limit_minutes);
    match &config.raw_text_file {
        Some(path) => info!("📄 离线模式，读取: {}", path),
        None => info!(
            "🌐 生成服务: {:?} ({})",
            config.generation_provider,
            config.api_url()
        ),
    }
    info!("{}", "=".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `artifacts`: 本次出卷产物
/// - `questions_path` / `answers_path`: 写入的文件路径
pub fn print_final_stats(artifacts: &ExamArtifacts, questions_path: &Path, answers_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 出卷完成");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!(
        "📝 题目: {} ({} 页, {} 字节)",
        questions_path.display(),
        artifacts.questions.document.page_count(),
        artifacts.questions.document.len()
    );
    info!(
        "✅ 答案: {} ({} 页, {} 字节)",
        answers_path.display(),
        artifacts.answers.document.page_count(),
        artifacts.answers.document.len()
    );
    if artifacts.degraded {
        info!("⚠️ 生成内容无法切分，文档中为占位文本");
    }
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示，换行替换为空格
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    let flat = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.chars().count() > max_len {
        flat.chars().take(max_len).collect::<String>() + "..."
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("1. Q\nA. x", 20), "1. Q A. x");
        assert_eq!(truncate_text("abcdefghij", 4), "abcd...");
        assert_eq!(truncate_text("数学题目很长", 2), "数学...");
    }
}
