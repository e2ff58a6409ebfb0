//! 试卷请求与生成提示词

use crate::error::RequestError;
use crate::models::grade::{ClassLevel, Paper};
use crate::models::subject::Subject;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const MIN_QUESTIONS: u32 = 5;
pub const MAX_QUESTIONS: u32 = 50;
pub const DEFAULT_QUESTIONS: u32 = 10;

pub const MIN_TIME_LIMIT: u32 = 30;
pub const MAX_TIME_LIMIT: u32 = 180;
pub const DEFAULT_TIME_LIMIT: u32 = 60;

const SYSTEM_PROMPT: &str =
    "You are an experienced education professional creating high-quality exam questions.";

/// 一次出卷请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExamRequest {
    pub class_level: ClassLevel,
    pub subject: Subject,
    pub paper: Option<Paper>,
    pub num_questions: u32,
    pub time_limit_minutes: u32,
}

impl ExamRequest {
    /// 使用默认题量和时长创建请求
    pub fn new(class_level: ClassLevel, subject: Subject) -> Self {
        Self {
            class_level,
            subject,
            paper: None,
            num_questions: DEFAULT_QUESTIONS,
            time_limit_minutes: DEFAULT_TIME_LIMIT,
        }
    }

    pub fn with_paper(mut self, paper: Paper) -> Self {
        self.paper = Some(paper);
        self
    }

    pub fn with_num_questions(mut self, num_questions: u32) -> Self {
        self.num_questions = num_questions;
        self
    }

    pub fn with_time_limit(mut self, minutes: u32) -> Self {
        self.time_limit_minutes = minutes;
        self
    }

    /// 该年级/科目组合是否可以选择试卷
    pub fn paper_offered(&self) -> bool {
        self.class_level.has_papers() && self.subject.has_papers()
    }

    /// 校验请求参数
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.paper.is_some() && !self.paper_offered() {
            return Err(RequestError::PaperNotOffered {
                class: self.class_level.to_string(),
                subject: self.subject.to_string(),
            });
        }
        if !(MIN_QUESTIONS..=MAX_QUESTIONS).contains(&self.num_questions) {
            return Err(RequestError::QuestionCountOutOfRange {
                value: self.num_questions,
                min: MIN_QUESTIONS,
                max: MAX_QUESTIONS,
            });
        }
        if !(MIN_TIME_LIMIT..=MAX_TIME_LIMIT).contains(&self.time_limit_minutes) {
            return Err(RequestError::TimeLimitOutOfRange {
                value: self.time_limit_minutes,
                min: MIN_TIME_LIMIT,
                max: MAX_TIME_LIMIT,
            });
        }
        Ok(())
    }

    /// 构建发送给生成服务的提示词
    pub fn prompt(&self) -> ExamPrompt {
        let paper_info = self
            .paper
            .map(|p| format!(" ({})", p))
            .unwrap_or_default();

        let user = format!(
            "Generate {} multiple choice questions for {}{} for {}.\n\
             Each question should follow this format:\n\
             1. Question text\n\
             2. Four options labeled A, B, C, D\n\
             3. Correct answer letter\n\
             4. Brief explanation\n\
             \n\
             Make the questions challenging but appropriate for the level.\n\
             Ensure a mix of conceptual understanding and problem-solving.\n",
            self.num_questions, self.subject, paper_info, self.class_level
        );

        ExamPrompt {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    /// 文档标题，`kind` 为 "Questions" 或 "Answers"
    pub fn title(&self, kind: DocumentKind) -> String {
        format!("{} {} Exam {}", self.class_level, self.subject, kind.title_word())
    }

    /// 下载文件名：`{class}_{subject}_{questions|answers}_{YYYYMMDD}.pdf`
    pub fn file_name(&self, kind: DocumentKind, date: NaiveDate) -> String {
        format!(
            "{}_{}_{}_{}.pdf",
            self.class_level.name(),
            self.subject.name(),
            kind.file_word(),
            date.format("%Y%m%d")
        )
    }
}

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    Questions,
    Answers,
}

impl DocumentKind {
    fn title_word(self) -> &'static str {
        match self {
            DocumentKind::Questions => "Questions",
            DocumentKind::Answers => "Answers",
        }
    }

    fn file_word(self) -> &'static str {
        match self {
            DocumentKind::Questions => "questions",
            DocumentKind::Answers => "answers",
        }
    }
}

/// 生成服务的输入
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExamPrompt {
    pub system: String,
    pub user: String,
}

impl ExamPrompt {
    /// 转换为聊天消息列表（system 在前）
    pub fn messages(&self) -> Vec<ChatMessage> {
        vec![
            ChatMessage {
                content: self.system.clone(),
                role: "system".to_string(),
            },
            ChatMessage {
                content: self.user.clone(),
                role: "user".to_string(),
            },
        ]
    }
}

/// 聊天消息（RapidAPI 的请求体格式）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub content: String,
    pub role: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_paper_rules() {
        let ok = ExamRequest::new(ClassLevel::Form4, Subject::Chemistry).with_paper(Paper::Two);
        assert!(ok.validate().is_ok());

        let junior = ExamRequest::new(ClassLevel::Form2, Subject::Chemistry).with_paper(Paper::One);
        assert!(matches!(
            junior.validate(),
            Err(RequestError::PaperNotOffered { .. })
        ));

        let unpapered = ExamRequest::new(ClassLevel::Form3, Subject::Music).with_paper(Paper::One);
        assert!(unpapered.validate().is_err());

        // 不选试卷总是合法的
        assert!(ExamRequest::new(ClassLevel::Form1, Subject::Music).validate().is_ok());
    }

    #[test]
    fn test_validate_ranges() {
        let base = ExamRequest::new(ClassLevel::Form1, Subject::History);
        assert!(base.clone().with_num_questions(5).validate().is_ok());
        assert!(base.clone().with_num_questions(50).validate().is_ok());
        assert_eq!(
            base.clone().with_num_questions(4).validate(),
            Err(RequestError::QuestionCountOutOfRange {
                value: 4,
                min: 5,
                max: 50
            })
        );
        assert!(base.clone().with_time_limit(29).validate().is_err());
        assert!(base.with_time_limit(181).validate().is_err());
    }

    #[test]
    fn test_prompt_mentions_paper_and_count() {
        let request = ExamRequest::new(ClassLevel::Form3, Subject::Physics)
            .with_paper(Paper::One)
            .with_num_questions(12);
        let prompt = request.prompt();

        let expected = "Generate 12 multiple choice questions for Physics (Paper 1) for Form 3.";
        assert!(prompt.user.starts_with(expected));
        assert!(prompt.user.contains("Four options labeled A, B, C, D"));

        let messages = prompt.messages();
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].role, "user");
    }

    #[test]
    fn test_title_and_file_name() {
        let request = ExamRequest::new(ClassLevel::Form3, Subject::ComputerStudies);
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();

        assert_eq!(
            request.title(DocumentKind::Questions),
            "Form 3 Computer Studies Exam Questions"
        );
        assert_eq!(
            request.file_name(DocumentKind::Answers, date),
            "Form 3_Computer Studies_answers_20240309.pdf"
        );
    }
}
