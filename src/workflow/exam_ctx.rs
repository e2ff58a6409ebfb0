//! 出卷上下文
//!
//! 封装"谁在什么时候要哪一份试卷"这一信息，随请求传递，不做全局保存

use crate::models::ExamRequest;
use chrono::NaiveDateTime;
use std::fmt::Display;

/// 出卷上下文
#[derive(Debug, Clone)]
pub struct ExamCtx {
    /// 出卷请求
    pub request: ExamRequest,

    /// 发起人（仅用于日志显示）
    pub requested_by: Option<String>,

    /// 生成时间，同时用于文档时间戳和文件名日期
    pub generated_at: NaiveDateTime,
}

impl ExamCtx {
    /// 以当前本地时间创建上下文
    pub fn new(request: ExamRequest, requested_by: Option<String>) -> Self {
        Self::at(request, requested_by, chrono::Local::now().naive_local())
    }

    /// 使用指定时间创建上下文
    pub fn at(
        request: ExamRequest,
        requested_by: Option<String>,
        generated_at: NaiveDateTime,
    ) -> Self {
        Self {
            request,
            requested_by,
            generated_at,
        }
    }
}

impl Display for ExamCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{} {}", self.request.class_level, self.request.subject)?;
        if let Some(paper) = self.request.paper {
            write!(f, " {}", paper)?;
        }
        if let Some(who) = &self.requested_by {
            write!(f, " | {}", who)?;
        }
        write!(f, "]")
    }
}
