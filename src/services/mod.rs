pub mod renderer;
pub mod segmenter;

pub use renderer::{render, render_at, RenderedDocument};
pub use segmenter::{
    classify, segment, segment_bytes, try_segment_bytes, LineKind, SegmentationResult,
};
