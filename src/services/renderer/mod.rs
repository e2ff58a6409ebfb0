//! PDF 渲染服务 - 业务能力层
//!
//! 只负责"把一段文本排成可打印文档"，分两步：
//! 1. `layout` - 纯计算：折行、分页、页眉页脚
//! 2. `pdf` - 把排版结果一次性写成字节流

pub mod layout;
pub mod metrics;
pub mod pdf;

pub use layout::{DocumentLayout, DrawOp, FontStyle, PageLayout, ATTRIBUTION};

use crate::error::RenderError;
use chrono::NaiveDateTime;
use tracing::debug;

/// 渲染完成的文档，生成后不可修改
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    page_count: usize,
}

impl RenderedDocument {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }
}

impl AsRef<[u8]> for RenderedDocument {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

/// 渲染文档，生成时间取当前本地时间
pub fn render(content: &str, title: &str) -> Result<RenderedDocument, RenderError> {
    render_at(content, title, chrono::Local::now().naive_local())
}

/// 使用指定的生成时间渲染文档
pub fn render_at(
    content: &str,
    title: &str,
    generated_at: NaiveDateTime,
) -> Result<RenderedDocument, RenderError> {
    let layout = layout::layout_document(content, title, generated_at)?;
    debug!("排版完成: 《{}》共 {} 页", title, layout.page_count());

    let bytes = pdf::write_pdf(&layout, title)?;
    Ok(RenderedDocument {
        page_count: layout.page_count(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .unwrap()
            .and_hms_opt(8, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_render_produces_pdf_bytes() {
        let content = "EXAM QUESTIONS\n===============\n\n1. Why?";
        let doc = render_at(content, "Title", stamp()).unwrap();
        assert!(!doc.is_empty());
        assert!(doc.as_bytes().starts_with(b"%PDF"));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_render_empty_content() {
        let doc = render("", "Empty").unwrap();
        assert!(doc.as_bytes().starts_with(b"%PDF"));
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_longer_content_gives_larger_document() {
        let short = render_at("1. short", "T", stamp()).unwrap();
        let long_content = "1. a somewhat longer question line\nA. option\n".repeat(60);
        let long = render_at(&long_content, "T", stamp()).unwrap();

        assert!(long.len() > short.len());
        assert!(long.page_count() > 1);
    }

    #[test]
    fn test_unsupported_character_is_fatal() {
        let err = render_at("Question 1: ∑ x", "T", stamp()).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedCharacter { ch: '∑', .. }));
    }
}
