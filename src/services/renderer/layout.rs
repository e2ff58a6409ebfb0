//! 排版：把文本转换成按页排列的绘制指令
//!
//! 坐标单位为毫米，原点在页面左上角，y 向下增长。
//! 这一层不依赖 PDF 库，便于单独测试分页和折行。

use super::metrics::{char_width, is_encodable, text_width};
use crate::error::RenderError;
use chrono::NaiveDateTime;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// 单元格左右内边距
pub const CELL_PADDING_MM: f32 = 1.0;
/// 可用的文本宽度
pub const TEXT_WIDTH_MM: f32 = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - 2.0 * CELL_PADDING_MM;

pub const TITLE_SIZE_PT: f32 = 18.0;
pub const TITLE_ROW_MM: f32 = 20.0;
pub const META_SIZE_PT: f32 = 12.0;
pub const META_ROW_MM: f32 = 10.0;
pub const BODY_SIZE_PT: f32 = 12.0;
pub const BODY_ROW_MM: f32 = 10.0;
pub const LINE_GAP_MM: f32 = 2.0;
pub const FOOTER_SIZE_PT: f32 = 8.0;
pub const FOOTER_ROW_MM: f32 = 10.0;
/// 页脚距页面底部的距离，正文不得进入该区域
pub const FOOTER_ZONE_MM: f32 = 30.0;

pub const ATTRIBUTION: &str = "Generated by ZecoED Assessment System";

const BOLD_PREFIXES: [&str; 4] = ["Question", "EXAM", "ANSWER", "="];
const TAB_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Regular,
    Bold,
    Italic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const TITLE_BAND: Rgb = Rgb(240, 240, 240);
    pub const RULE: Rgb = Rgb(200, 200, 200);
    pub const BODY_TEXT: Rgb = Rgb(50, 50, 50);
    pub const FOOTER_TEXT: Rgb = Rgb(128, 128, 128);
    pub const BLACK: Rgb = Rgb(0, 0, 0);
}

/// 绘制指令
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    /// 填充矩形（标题底色）
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgb,
    },
    /// 水平分隔线
    Rule { x1: f32, x2: f32, y: f32, color: Rgb },
    /// 一行文字，`baseline` 为基线位置
    Text {
        text: String,
        x: f32,
        baseline: f32,
        size_pt: f32,
        style: FontStyle,
        color: Rgb,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageLayout {
    /// 页码（从 1 开始）
    pub number: usize,
    pub ops: Vec<DrawOp>,
}

impl PageLayout {
    /// 页面上的全部文字
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.ops.iter().filter_map(|op| match op {
            DrawOp::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// 正文行是否使用粗体
pub fn is_label_line(line: &str) -> bool {
    let trimmed = line.trim();
    BOLD_PREFIXES.iter().any(|p| trimmed.starts_with(p))
}

/// 把一行文字折成不超过 `max_width` 的多行
///
/// 优先在空格处断开；单个词过长时按字符断开。空行返回一个空行。
pub fn wrap_line(line: &str, style: FontStyle, size_pt: f32, max_width: f32) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut rows = Vec::new();
    let mut start = 0;
    let mut i = 0;
    let mut width = 0.0;
    let mut last_space: Option<usize> = None;

    while i < chars.len() {
        let c = chars[i];
        if c == ' ' {
            last_space = Some(i);
        }
        width += char_width(c, style, size_pt);

        if width > max_width {
            match last_space {
                Some(space) if space > start => {
                    rows.push(chars[start..space].iter().collect());
                    start = space + 1;
                }
                _ => {
                    // 至少放下一个字符，避免死循环
                    let end = if i == start { i + 1 } else { i };
                    rows.push(chars[start..end].iter().collect());
                    start = end;
                }
            }
            i = start;
            width = 0.0;
            last_space = None;
            continue;
        }
        i += 1;
    }

    if start < chars.len() || rows.is_empty() {
        rows.push(chars[start..].iter().collect());
    }
    rows
}

/// 排版游标
struct Cursor {
    pages: Vec<PageLayout>,
    y: f32,
}

impl Cursor {
    fn new() -> Self {
        let mut cursor = Self {
            pages: Vec::new(),
            y: MARGIN_MM,
        };
        cursor.new_page();
        cursor
    }

    fn new_page(&mut self) {
        self.pages.push(PageLayout {
            number: self.pages.len() + 1,
            ops: Vec::new(),
        });
        self.y = MARGIN_MM;
    }

    fn push(&mut self, op: DrawOp) {
        if let Some(page) = self.pages.last_mut() {
            page.ops.push(op);
        }
    }

    /// 正文底线
    fn body_limit() -> f32 {
        PAGE_HEIGHT_MM - FOOTER_ZONE_MM
    }

    /// 放不下一行时自动换页
    fn ensure_room(&mut self, height: f32) {
        if self.y + height > Self::body_limit() && self.y > MARGIN_MM {
            self.new_page();
        }
    }
}

/// 单元格内文字的基线位置
fn baseline(row_top: f32, row_height: f32, size_pt: f32) -> f32 {
    row_top + 0.5 * row_height + 0.3 * size_pt * 25.4 / 72.0
}

/// 在页边距之间居中的 x 坐标
fn centered_x(text: &str, style: FontStyle, size_pt: f32) -> f32 {
    let free = PAGE_WIDTH_MM - 2.0 * MARGIN_MM - text_width(text, style, size_pt);
    MARGIN_MM + (free / 2.0).max(CELL_PADDING_MM)
}

/// 去掉控制字符（制表符展开为空格），内置字体无法输出它们
fn normalize_line(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    for c in line.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }
    out
}

/// 检查文本能否用内置字体输出
fn check_encodable(text: &str, location: impl Fn() -> String) -> Result<(), RenderError> {
    match text.chars().find(|&c| !is_encodable(c)) {
        Some(ch) => Err(RenderError::UnsupportedCharacter {
            location: location(),
            ch,
        }),
        None => Ok(()),
    }
}

/// 排版整份文档
pub fn layout_document(
    content: &str,
    title: &str,
    generated_at: NaiveDateTime,
) -> Result<DocumentLayout, RenderError> {
    let title = normalize_line(title);
    check_encodable(&title, || "标题".to_string())?;

    let lines: Vec<String> = content.split('\n').map(normalize_line).collect();
    for (idx, line) in lines.iter().enumerate() {
        check_encodable(line, || format!("第 {} 行", idx + 1))?;
    }

    let mut cursor = Cursor::new();
    layout_header(&mut cursor, &title, generated_at);
    layout_body(&mut cursor, &lines);

    let mut pages = cursor.pages;
    for page in &mut pages {
        layout_footer(page);
    }
    Ok(DocumentLayout { pages })
}

fn layout_header(cursor: &mut Cursor, title: &str, generated_at: NaiveDateTime) {
    // 标题过长时逐行换页，每行自带底色
    for row in wrap_line(title.trim(), FontStyle::Bold, TITLE_SIZE_PT, TEXT_WIDTH_MM) {
        cursor.ensure_room(TITLE_ROW_MM);
        let y = cursor.y;
        cursor.push(DrawOp::FillRect {
            x: MARGIN_MM,
            y,
            width: PAGE_WIDTH_MM - 2.0 * MARGIN_MM,
            height: TITLE_ROW_MM,
            color: Rgb::TITLE_BAND,
        });
        cursor.push(DrawOp::Text {
            x: centered_x(&row, FontStyle::Bold, TITLE_SIZE_PT),
            text: row,
            baseline: baseline(y, TITLE_ROW_MM, TITLE_SIZE_PT),
            size_pt: TITLE_SIZE_PT,
            style: FontStyle::Bold,
            color: Rgb::BLACK,
        });
        cursor.y += TITLE_ROW_MM;
    }

    let stamp = format!("Generated on: {}", generated_at.format("%Y-%m-%d %H:%M"));
    cursor.ensure_room(META_ROW_MM);
    let y = cursor.y;
    cursor.push(DrawOp::Text {
        x: centered_x(&stamp, FontStyle::Regular, META_SIZE_PT),
        text: stamp,
        baseline: baseline(y, META_ROW_MM, META_SIZE_PT),
        size_pt: META_SIZE_PT,
        style: FontStyle::Regular,
        color: Rgb::BLACK,
    });
    cursor.y += META_ROW_MM;

    cursor.ensure_room(10.0);
    cursor.push(DrawOp::Rule {
        x1: MARGIN_MM,
        x2: PAGE_WIDTH_MM - MARGIN_MM,
        y: cursor.y + 5.0,
        color: Rgb::RULE,
    });
    cursor.y += 10.0;
}

fn layout_body(cursor: &mut Cursor, lines: &[String]) {
    for line in lines {
        let style = if is_label_line(line) {
            FontStyle::Bold
        } else {
            FontStyle::Regular
        };

        for row in wrap_line(line, style, BODY_SIZE_PT, TEXT_WIDTH_MM) {
            cursor.ensure_room(BODY_ROW_MM);
            if !row.is_empty() {
                let y = cursor.y;
                cursor.push(DrawOp::Text {
                    text: row,
                    x: MARGIN_MM + CELL_PADDING_MM,
                    baseline: baseline(y, BODY_ROW_MM, BODY_SIZE_PT),
                    size_pt: BODY_SIZE_PT,
                    style,
                    color: Rgb::BODY_TEXT,
                });
            }
            cursor.y += BODY_ROW_MM;
        }
        cursor.y += LINE_GAP_MM;
    }
}

fn layout_footer(page: &mut PageLayout) {
    let top = PAGE_HEIGHT_MM - FOOTER_ZONE_MM;
    let y = baseline(top, FOOTER_ROW_MM, FOOTER_SIZE_PT);

    page.ops.push(DrawOp::Text {
        text: ATTRIBUTION.to_string(),
        x: centered_x(ATTRIBUTION, FontStyle::Italic, FOOTER_SIZE_PT),
        baseline: y,
        size_pt: FOOTER_SIZE_PT,
        style: FontStyle::Italic,
        color: Rgb::FOOTER_TEXT,
    });

    let label = format!("Page {}", page.number);
    let x = PAGE_WIDTH_MM
        - MARGIN_MM
        - CELL_PADDING_MM
        - text_width(&label, FontStyle::Italic, FOOTER_SIZE_PT);
    page.ops.push(DrawOp::Text {
        text: label,
        x,
        baseline: y,
        size_pt: FOOTER_SIZE_PT,
        style: FontStyle::Italic,
        color: Rgb::FOOTER_TEXT,
    });
}
