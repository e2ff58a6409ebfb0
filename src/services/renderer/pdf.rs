//! 把排版结果写成 PDF 字节流（printpdf，内置 Helvetica 字体）

use super::layout::{DocumentLayout, DrawOp, FontStyle, Rgb, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::error::RenderError;
use printpdf::path::PaintMode;
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Rect,
};
use tracing::debug;

const LAYER_NAME: &str = "Layer 1";
const RULE_THICKNESS_PT: f32 = 0.57;

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

impl Fonts {
    fn get(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }
}

fn pdf_error(e: impl std::fmt::Display) -> RenderError {
    RenderError::Pdf(e.to_string())
}

fn color(rgb: Rgb) -> Color {
    let Rgb(r, g, b) = rgb;
    Color::Rgb(printpdf::Rgb::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        None,
    ))
}

/// 排版坐标（左上原点）→ PDF 坐标（左下原点）
fn flip(y: f32) -> Mm {
    Mm(PAGE_HEIGHT_MM - y)
}

/// 一次性生成完整的 PDF
pub fn write_pdf(layout: &DocumentLayout, title: &str) -> Result<Vec<u8>, RenderError> {
    let (doc, first_page, first_layer) =
        PdfDocument::new(title, Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME);

    let fonts = Fonts {
        regular: doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_error)?,
        bold: doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_error)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_error)?,
    };

    for (idx, page) in layout.pages.iter().enumerate() {
        let (page_index, layer_index) = if idx == 0 {
            (first_page, first_layer)
        } else {
            doc.add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), LAYER_NAME)
        };
        let layer = doc.get_page(page_index).get_layer(layer_index);
        for op in &page.ops {
            draw(&layer, &fonts, op);
        }
    }

    let bytes = doc.save_to_bytes().map_err(pdf_error)?;
    debug!(
        "PDF 生成完成: {} 页, {} 字节",
        layout.page_count(),
        bytes.len()
    );
    Ok(bytes)
}

fn draw(layer: &PdfLayerReference, fonts: &Fonts, op: &DrawOp) {
    match op {
        DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color: fill,
        } => {
            layer.set_fill_color(color(*fill));
            let rect = Rect::new(Mm(*x), flip(y + height), Mm(x + width), flip(*y))
                .with_mode(PaintMode::Fill);
            layer.add_rect(rect);
        }
        DrawOp::Rule {
            x1,
            x2,
            y,
            color: stroke,
        } => {
            layer.set_outline_color(color(*stroke));
            layer.set_outline_thickness(RULE_THICKNESS_PT);
            layer.add_line(Line {
                points: vec![
                    (Point::new(Mm(*x1), flip(*y)), false),
                    (Point::new(Mm(*x2), flip(*y)), false),
                ],
                is_closed: false,
            });
        }
        DrawOp::Text {
            text,
            x,
            baseline,
            size_pt,
            style,
            color: fill,
        } => {
            if text.is_empty() {
                return;
            }
            // PDF 文字颜色取自填充色
            layer.set_fill_color(color(*fill));
            layer.use_text(text.as_str(), *size_pt, Mm(*x), flip(*baseline), fonts.get(*style));
        }
    }
}
