use crate::error::ChartResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and headless engine usage.
///
/// It still validates frame content so tests can catch invalid geometry before
/// a real backend is introduced.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub frames_rendered: usize,
    pub last_command_count: usize,
    pub last_line_count: usize,
    pub last_path_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        self.frames_rendered += 1;
        self.last_command_count = frame.len();
        self.last_line_count = frame.line_count();
        self.last_path_count = frame.path_count();
        self.last_rect_count = frame.rect_count();
        self.last_text_count = frame.text_count();
        Ok(())
    }
}
