use serde::{Deserialize, Serialize};

use crate::core::{PaneId, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{LinePrimitive, PathPrimitive, RectPrimitive, TextPrimitive};

/// Paint order inside one frame; commands are emitted layer by layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RenderLayer {
    Reference,
    Series,
    Axis,
    Crosshair,
    Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Primitive {
    Line(LinePrimitive),
    Path(PathPrimitive),
    Rect(RectPrimitive),
    Text(TextPrimitive),
}

impl Primitive {
    pub fn validate(&self) -> ChartResult<()> {
        match self {
            Self::Line(line) => line.validate(),
            Self::Path(path) => path.validate(),
            Self::Rect(rect) => rect.validate(),
            Self::Text(text) => text.validate(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawCommand {
    pub pane_id: PaneId,
    pub layer: RenderLayer,
    pub primitive: Primitive,
}

/// Backend-agnostic scene for one chart draw pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub viewport: Viewport,
    pub commands: Vec<DrawCommand>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            commands: Vec::new(),
        }
    }

    pub fn push(&mut self, pane_id: PaneId, layer: RenderLayer, primitive: Primitive) {
        self.commands.push(DrawCommand {
            pane_id,
            layer,
            primitive,
        });
    }

    pub fn validate(&self) -> ChartResult<()> {
        if !self.viewport.is_valid() {
            return Err(ChartError::InvalidViewport {
                width: self.viewport.width,
                height: self.viewport.height,
            });
        }
        for command in &self.commands {
            command.primitive.validate()?;
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn pane_commands(&self, pane_id: PaneId) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |command| command.pane_id == pane_id)
    }

    pub fn layer_commands(&self, layer: RenderLayer) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(move |command| command.layer == layer)
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextPrimitive> {
        self.commands.iter().filter_map(|command| match &command.primitive {
            Primitive::Text(text) => Some(text),
            _ => None,
        })
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.count(|primitive| matches!(primitive, Primitive::Line(_)))
    }

    #[must_use]
    pub fn path_count(&self) -> usize {
        self.count(|primitive| matches!(primitive, Primitive::Path(_)))
    }

    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.count(|primitive| matches!(primitive, Primitive::Rect(_)))
    }

    #[must_use]
    pub fn text_count(&self) -> usize {
        self.count(|primitive| matches!(primitive, Primitive::Text(_)))
    }

    fn count(&self, predicate: impl Fn(&Primitive) -> bool) -> usize {
        self.commands
            .iter()
            .filter(|command| predicate(&command.primitive))
            .count()
    }
}
