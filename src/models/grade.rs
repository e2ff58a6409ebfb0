use crate::error::RequestError;
use regex::Regex;
use std::sync::OnceLock;

/// 匹配 "Form 3" / "form3" / "F3" / "3"
fn class_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:form\s*|f)?([1-4])\s*$").expect("合法的正则表达式")
    })
}

/// 匹配 "Paper 2" / "paper2" / "P2" / "2"
fn paper_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*(?:paper\s*|p)?([12])\s*$").expect("合法的正则表达式")
    })
}

/// 取出第一个捕获组中的数字
fn captured_digit(pattern: &Regex, s: &str) -> Option<u8> {
    pattern
        .captures(s)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 年级（Form 1 ~ Form 4）
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub enum ClassLevel {
    Form1,
    Form2,
    Form3,
    Form4,
}

impl ClassLevel {
    pub const ALL: [ClassLevel; 4] = [
        ClassLevel::Form1,
        ClassLevel::Form2,
        ClassLevel::Form3,
        ClassLevel::Form4,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            ClassLevel::Form1 => "Form 1",
            ClassLevel::Form2 => "Form 2",
            ClassLevel::Form3 => "Form 3",
            ClassLevel::Form4 => "Form 4",
        }
    }

    /// 高年级才分卷
    pub fn has_papers(self) -> bool {
        matches!(self, ClassLevel::Form3 | ClassLevel::Form4)
    }

    /// 解析年级，接受 "Form 3" / "form3" / "F3" / "3"
    pub fn parse(s: &str) -> Result<Self, RequestError> {
        match captured_digit(class_pattern(), s) {
            Some(1) => Ok(ClassLevel::Form1),
            Some(2) => Ok(ClassLevel::Form2),
            Some(3) => Ok(ClassLevel::Form3),
            Some(4) => Ok(ClassLevel::Form4),
            _ => Err(RequestError::UnknownClass(s.to_string())),
        }
    }
}

impl std::fmt::Display for ClassLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 试卷编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Paper {
    One,
    Two,
}

impl Paper {
    pub fn number(self) -> u8 {
        match self {
            Paper::One => 1,
            Paper::Two => 2,
        }
    }

    /// 解析试卷编号，接受 "Paper 2" / "paper2" / "P2" / "2"
    pub fn parse(s: &str) -> Result<Self, RequestError> {
        match captured_digit(paper_pattern(), s) {
            Some(1) => Ok(Paper::One),
            Some(2) => Ok(Paper::Two),
            _ => Err(RequestError::UnknownPaper(s.to_string())),
        }
    }
}

impl std::fmt::Display for Paper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Paper {}", self.number())
    }
}
