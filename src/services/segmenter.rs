//! 题目/答案切分服务 - 业务能力层
//!
//! 把生成服务返回的一整段自由文本，按行分类后重新组装成
//! "题目" 和 "答案" 两份文档。
//!
//! ## 分类规则（按顺序，命中即停）
//! 1. 行内包含 `correct answer:` / `explanation:` / `answer key:` → 答案标记行
//! 2. 行首为 `question` / `q.` / `q)` / `#`，或首字符是 ASCII 数字 → 题目标记行
//! 3. 其他 → 续行，跟随当前所在的区块
//!
//! 空行不参与分类，直接丢弃。

use crate::error::SegmentError;
use tracing::{debug, warn};

pub const QUESTIONS_HEADER: &str = "EXAM QUESTIONS";
pub const ANSWERS_HEADER: &str = "ANSWER KEY";

pub const QUESTIONS_PLACEHOLDER: &str = "Error processing questions";
pub const ANSWERS_PLACEHOLDER: &str = "Error processing answers";

const ANSWER_MARKERS: [&str; 3] = ["correct answer:", "explanation:", "answer key:"];
const QUESTION_PREFIXES: [&str; 4] = ["question", "q.", "q)", "#"];

/// 行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// 开始一道新题
    QuestionMarker,
    /// 开始一条新的答案/解析
    AnswerMarker,
    /// 接在当前区块后面
    Continuation,
}

/// 对单行分类（调用方负责先去掉首尾空白）
pub fn classify(line: &str) -> LineKind {
    let lower = line.to_lowercase();

    if ANSWER_MARKERS.iter().any(|marker| lower.contains(marker)) {
        return LineKind::AnswerMarker;
    }

    let starts_with_digit = line.chars().next().is_some_and(|c| c.is_ascii_digit());
    if starts_with_digit || QUESTION_PREFIXES.iter().any(|p| lower.starts_with(p)) {
        return LineKind::QuestionMarker;
    }

    LineKind::Continuation
}

/// 切分结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentationResult {
    pub questions_text: String,
    pub answers_text: String,
}

impl SegmentationResult {
    /// 切分失败时的占位结果
    pub fn placeholder() -> Self {
        Self {
            questions_text: QUESTIONS_PLACEHOLDER.to_string(),
            answers_text: ANSWERS_PLACEHOLDER.to_string(),
        }
    }

    /// 是否为占位结果
    pub fn is_placeholder(&self) -> bool {
        self.questions_text == QUESTIONS_PLACEHOLDER && self.answers_text == ANSWERS_PLACEHOLDER
    }

    pub fn into_parts(self) -> (String, String) {
        (self.questions_text, self.answers_text)
    }
}

/// 正在累积的区块
#[derive(Default)]
struct BlockAccumulator<'a> {
    current: Vec<&'a str>,
    blocks: Vec<String>,
}

impl<'a> BlockAccumulator<'a> {
    fn push(&mut self, line: &'a str) {
        self.current.push(line);
    }

    fn flush(&mut self) {
        if !self.current.is_empty() {
            self.blocks.push(self.current.join("\n"));
            self.current.clear();
        }
    }

    fn finish(mut self, header: &str, rule_len: usize) -> String {
        self.flush();
        format!(
            "{}\n{}\n\n{}",
            header,
            "=".repeat(rule_len),
            self.blocks.join("\n\n")
        )
    }
}

/// 切分文本，永不失败
pub fn segment(raw_text: &str) -> SegmentationResult {
    let mut questions = BlockAccumulator::default();
    let mut answers = BlockAccumulator::default();
    let mut in_answer_section = false;

    for line in raw_text.split('\n').map(str::trim).filter(|l| !l.is_empty()) {
        match classify(line) {
            LineKind::AnswerMarker => {
                questions.flush();
                in_answer_section = true;
                answers.push(line);
            }
            LineKind::QuestionMarker => {
                answers.flush();
                in_answer_section = false;
                questions.push(line);
            }
            LineKind::Continuation if in_answer_section => answers.push(line),
            LineKind::Continuation => questions.push(line),
        }
    }

    debug!(
        "切分完成: {} 个题目区块, {} 个答案区块",
        questions.blocks.len() + usize::from(!questions.current.is_empty()),
        answers.blocks.len() + usize::from(!answers.current.is_empty())
    );

    SegmentationResult {
        questions_text: questions.finish(QUESTIONS_HEADER, 15),
        answers_text: answers.finish(ANSWERS_HEADER, 10),
    }
}

/// 切分原始字节（直接来自网络响应），编码错误会返回 `Err`
pub fn try_segment_bytes(raw: &[u8]) -> Result<SegmentationResult, SegmentError> {
    let text = std::str::from_utf8(raw).map_err(|e| SegmentError::InvalidEncoding {
        offset: e.valid_up_to(),
    })?;
    Ok(segment(text))
}

/// 切分原始字节，失败时降级为占位文本
pub fn segment_bytes(raw: &[u8]) -> SegmentationResult {
    match try_segment_bytes(raw) {
        Ok(result) => result,
        Err(e) => {
            warn!("⚠️ 题目切分失败，使用占位文本: {}", e);
            SegmentationResult::placeholder()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUESTIONS_PREFIX: &str = "EXAM QUESTIONS\n===============\n\n";
    const ANSWERS_PREFIX: &str = "ANSWER KEY\n==========\n\n";

    fn body<'a>(text: &'a str, prefix: &str) -> &'a str {
        text.strip_prefix(prefix).expect("缺少固定标题")
    }

    #[test]
    fn test_classify_answer_markers() {
        assert_eq!(classify("Correct answer: B"), LineKind::AnswerMarker);
        assert_eq!(classify("EXPLANATION: because"), LineKind::AnswerMarker);
        assert_eq!(classify("See the answer key: page 4"), LineKind::AnswerMarker);
        // 没有冒号不算
        assert_eq!(classify("The correct answer is B"), LineKind::Continuation);
    }

    #[test]
    fn test_classify_question_markers() {
        assert_eq!(classify("Question 3: What is x?"), LineKind::QuestionMarker);
        assert_eq!(classify("q. define inertia"), LineKind::QuestionMarker);
        assert_eq!(classify("Q) define mass"), LineKind::QuestionMarker);
        assert_eq!(classify("## Section"), LineKind::QuestionMarker);
        assert_eq!(classify("12) Which gas"), LineKind::QuestionMarker);
        assert_eq!(classify("A. 3"), LineKind::Continuation);
        assert_eq!(classify("Quite so"), LineKind::Continuation);
    }

    #[test]
    fn test_numeric_symbols_are_not_question_markers() {
        assert_eq!(classify("½ of the class passed"), LineKind::Continuation);
        assert_eq!(classify("Ⅳ. roman"), LineKind::Continuation);
        assert_eq!(classify("² squared"), LineKind::Continuation);

        // 答案中间出现分数行时不应切回题目区
        let result = segment("1. Q?\nCorrect answer: A\n½ of the class passed\n2. Next?");
        assert_eq!(
            body(&result.answers_text, ANSWERS_PREFIX),
            "Correct answer: A\n½ of the class passed"
        );
        assert_eq!(body(&result.questions_text, QUESTIONS_PREFIX), "1. Q?\n\n2. Next?");
    }

    #[test]
    fn test_answer_marker_wins_over_question_prefix() {
        assert_eq!(
            classify("5. explanation: distance over time"),
            LineKind::AnswerMarker
        );

        let result = segment("5. explanation: distance over time");
        assert_eq!(body(&result.questions_text, QUESTIONS_PREFIX), "");
        assert_eq!(
            body(&result.answers_text, ANSWERS_PREFIX),
            "5. explanation: distance over time"
        );
    }

    #[test]
    fn test_empty_input_yields_headers_only() {
        let result = segment("");
        assert_eq!(result.questions_text, QUESTIONS_PREFIX);
        assert_eq!(result.answers_text, ANSWERS_PREFIX);

        let whitespace = segment("  \n\t\n\r\n");
        assert_eq!(whitespace, result);
    }

    #[test]
    fn test_mode_switch_boundary() {
        let raw = "1. What is 2+2?\n\
                   A. 3\n\
                   B. 4\n\
                   Correct answer: B\n\
                   Explanation: basic addition\n\
                   2. What is the capital of France?\n\
                   A. London\n\
                   B. Paris\n\
                   Correct answer: B";
        let result = segment(raw);

        assert_eq!(
            body(&result.questions_text, QUESTIONS_PREFIX),
            "1. What is 2+2?\nA. 3\nB. 4\n\n2. What is the capital of France?\nA. London\nB. Paris"
        );
        assert_eq!(
            body(&result.answers_text, ANSWERS_PREFIX),
            "Correct answer: B\nExplanation: basic addition\n\nCorrect answer: B"
        );
    }

    #[test]
    fn test_no_markers_is_single_question_block() {
        let raw = "Some intro text\n\n   indented line   \nclosing remark";
        let result = segment(raw);

        assert_eq!(
            body(&result.questions_text, QUESTIONS_PREFIX),
            "Some intro text\nindented line\nclosing remark"
        );
        assert_eq!(result.answers_text, ANSWERS_PREFIX);
    }

    #[test]
    fn test_blank_lines_do_not_split_blocks() {
        let raw = "1. First?\n\nA. yes\n\n\nB. no\nCorrect answer: A\n\nBecause it is.";
        let result = segment(raw);

        assert_eq!(
            body(&result.questions_text, QUESTIONS_PREFIX),
            "1. First?\nA. yes\nB. no"
        );
        assert_eq!(
            body(&result.answers_text, ANSWERS_PREFIX),
            "Correct answer: A\nBecause it is."
        );
    }

    #[test]
    fn test_consecutive_question_markers_share_a_block() {
        // 只有遇到答案标记才会结束题目区块
        let raw = "Question 1\nQuestion 2\nCorrect answer: C";
        let result = segment(raw);
        assert_eq!(
            body(&result.questions_text, QUESTIONS_PREFIX),
            "Question 1\nQuestion 2"
        );
    }

    #[test]
    fn test_windows_line_endings_are_trimmed() {
        let result = segment("1. Pick one\r\nA. x\r\nCorrect answer: A\r\n");
        assert_eq!(
            body(&result.questions_text, QUESTIONS_PREFIX),
            "1. Pick one\nA. x"
        );
        assert_eq!(body(&result.answers_text, ANSWERS_PREFIX), "Correct answer: A");
    }

    #[test]
    fn test_every_non_blank_line_lands_exactly_once_in_order() {
        let raw = "Intro line\n\
                   1) Which planet is largest?\n\
                   a) Mars\n\
                   b) Jupiter\n\
                   Answer key: b\n\
                   Jupiter is a gas giant.\n\
                   # Section B\n\
                   Q. Name a noble gas\n\
                   Correct Answer: Neon\n\
                   \n\
                   3. Trailing question without answer\n\
                   c) option";
        let result = segment(raw);

        let input: Vec<&str> = raw.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let output_lines = |text: &str, prefix: &str| -> Vec<String> {
            body(text, prefix)
                .lines()
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect()
        };
        let questions = output_lines(&result.questions_text, QUESTIONS_PREFIX);
        let answers = output_lines(&result.answers_text, ANSWERS_PREFIX);

        assert_eq!(questions.len() + answers.len(), input.len());

        // 每一侧都保持输入中的相对顺序
        let mut q_iter = questions.iter();
        let mut a_iter = answers.iter();
        let mut q_next = q_iter.next();
        let mut a_next = a_iter.next();
        for line in input {
            if q_next.map(String::as_str) == Some(line) {
                q_next = q_iter.next();
            } else if a_next.map(String::as_str) == Some(line) {
                a_next = a_iter.next();
            } else {
                panic!("行丢失或乱序: {}", line);
            }
        }
        assert!(q_next.is_none() && a_next.is_none());
    }

    #[test]
    fn test_invalid_utf8_degrades_to_placeholder() {
        let raw = b"1. Question\n\xff\xfe broken";
        assert!(matches!(
            try_segment_bytes(raw),
            Err(SegmentError::InvalidEncoding { offset: 12 })
        ));

        let result = segment_bytes(raw);
        assert!(result.is_placeholder());
        assert_eq!(result.questions_text, "Error processing questions");
        assert_eq!(result.answers_text, "Error processing answers");
    }

    #[test]
    fn test_valid_bytes_match_str_entry_point() {
        let raw = "1. Q\nCorrect answer: A";
        assert_eq!(segment_bytes(raw.as_bytes()), segment(raw));
    }
}
