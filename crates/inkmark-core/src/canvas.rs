//! Scene controller: owns the shapes and turns pointer samples and commands
//! into shape mutations, selection changes and history snapshots.

use crate::config::{ConfigError, EditorConfig};
use crate::geometry::union_bounds;
use crate::history::HistoryManager;
use crate::shapes::{
    Arrow, ColorParseError, Ellipse, Freehand, Pixelate, Rectangle, SerializableColor, Shape, ShapeId,
    ShapeStyle, Text,
};
use crate::surface::{Background, ImageHandle, PatternProvider, Surface};
use crate::tools::{CursorIcon, ToolKind};
use crate::transformer::{Corner, HandleHit, Transformer};
use kurbo::{Circle, Point, Rect, Shape as KurboShape, Stroke};
use std::fmt;

/// Outline color of the mosaic brush cursor.
const BRUSH_CURSOR_COLOR: SerializableColor = SerializableColor::black();

/// An open text input, owned by the boundary layer until committed or cancelled.
#[derive(Debug, Clone, PartialEq)]
pub struct TextEditSession {
    /// Block being edited, or `None` for a new block.
    pub target: Option<ShapeId>,
    /// Top-left of the input.
    pub position: Point,
    /// Current input value.
    pub text: String,
    pub color: SerializableColor,
    pub font_size: f64,
    pub font_family: String,
}

/// What the current pointer gesture is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Interaction {
    Idle,
    /// A shape created on pointer-down is being sized or extended.
    Drawing { id: ShapeId },
    /// The selected shape follows the pointer.
    Dragging { last: Point },
    /// A transformer corner of the selected shape is being dragged.
    Resizing { corner: Corner },
}

/// Interactive annotation canvas.
pub struct Canvas {
    /// Shapes in paint order (last is topmost).
    shapes: Vec<Shape>,
    history: HistoryManager<Shape>,
    transformer: Transformer,
    tool: ToolKind,
    /// Style applied to new shapes and to the selection by the style setters.
    style: ShapeStyle,
    config: EditorConfig,
    interaction: Interaction,
    text_edit: Option<TextEditSession>,
    patterns: Option<Box<dyn PatternProvider>>,
    background: Background,
    /// Last pointer position over the canvas.
    pointer: Option<Point>,
    needs_redraw: bool,
}

impl fmt::Debug for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Canvas")
            .field("shapes", &self.shapes.len())
            .field("tool", &self.tool)
            .field("style", &self.style)
            .field("selected", &self.transformer.attached())
            .field("interaction", &self.interaction)
            .field("text_edit", &self.text_edit)
            .finish_non_exhaustive()
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl Canvas {
    /// Create an empty canvas with the default configuration.
    pub fn new() -> Self {
        Self::build(EditorConfig::default(), SerializableColor::red(), SerializableColor::white())
    }

    /// Create an empty canvas from a configuration, validating it first.
    pub fn with_config(config: EditorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let stroke = config.stroke_color()?;
        let background = config.background_color()?;
        Ok(Self::build(config, stroke, background))
    }

    fn build(config: EditorConfig, stroke: SerializableColor, background: SerializableColor) -> Self {
        Self {
            shapes: Vec::new(),
            history: HistoryManager::with_limit(config.history_limit),
            transformer: Transformer::with_handle_size(config.handle_size),
            tool: ToolKind::default(),
            style: ShapeStyle::new(stroke, config.line_width),
            interaction: Interaction::Idle,
            text_edit: None,
            patterns: None,
            background: Background::Solid(background),
            pointer: None,
            needs_redraw: true,
            config,
        }
    }

    /// Install the source of mosaic patterns.
    pub fn set_pattern_provider(&mut self, provider: Box<dyn PatternProvider>) {
        self.patterns = Some(provider);
    }

    /// Show a loaded image underneath the shapes.
    pub fn set_background_image(&mut self, image: ImageHandle) {
        self.background = Background::Image(image);
        self.needs_redraw = true;
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    // --- queries ---

    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager<Shape> {
        &self.history
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn style(&self) -> ShapeStyle {
        self.style
    }

    pub fn text_edit(&self) -> Option<&TextEditSession> {
        self.text_edit.as_ref()
    }

    pub fn get_shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    fn get_shape_mut(&mut self, id: ShapeId) -> Option<&mut Shape> {
        self.shapes.iter_mut().find(|s| s.id() == id)
    }

    pub fn selected_shape(&self) -> Option<&Shape> {
        self.get_shape(self.transformer.attached()?)
    }

    fn selected_shape_mut(&mut self) -> Option<&mut Shape> {
        let id = self.transformer.attached()?;
        self.get_shape_mut(id)
    }

    /// Union of all shape bounds, or `None` for an empty canvas.
    pub fn content_bounds(&self) -> Option<Rect> {
        union_bounds(self.shapes.iter().map(Shape::bounds))
    }

    /// Topmost shape under `point`.
    pub fn shape_at(&self, point: Point) -> Option<&Shape> {
        let hit = self.shapes.iter().rev().find(|s| s.hit_test(point));
        if let Some(shape) = hit {
            log::trace!("hit {} {} at {:?}", shape.kind_name(), shape.id(), point);
        }
        hit
    }

    /// Cursor for the current tool, hover position and gesture.
    pub fn cursor(&self) -> CursorIcon {
        match self.tool {
            ToolKind::Select => match self.interaction {
                Interaction::Resizing { corner } => corner.cursor(),
                Interaction::Dragging { .. } => CursorIcon::Move,
                _ => {
                    let Some(point) = self.pointer else {
                        return CursorIcon::Default;
                    };
                    if self.transformer.attached().is_some() {
                        CursorIcon::for_handle(self.transformer.hit_test(&self.shapes, point))
                    } else if self.shape_at(point).is_some() {
                        CursorIcon::Move
                    } else {
                        CursorIcon::Default
                    }
                }
            },
            ToolKind::Mosaic => CursorIcon::None,
            _ => CursorIcon::Crosshair,
        }
    }

    /// Whether anything changed since the last [`take_redraw`](Self::take_redraw).
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and reset the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    // --- selection ---

    /// Select a shape by id, or clear the selection.
    ///
    /// An id that is not on the canvas clears the selection.
    pub fn select(&mut self, id: Option<ShapeId>) {
        for shape in &mut self.shapes {
            shape.set_selected(Some(shape.id()) == id);
        }
        let target = id.and_then(|id| self.shapes.iter().find(|s| s.id() == id));
        self.transformer.attach(target);
        self.needs_redraw = true;
    }

    fn snapshot(&mut self) {
        self.history.push(&self.shapes);
    }

    // --- commands ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        log::debug!("tool: {:?} -> {:?}", self.tool, tool);
        self.tool = tool;
        self.select(None);
    }

    /// Set the current color and recolor the selection.
    pub fn set_color(&mut self, color: &str) -> Result<(), ColorParseError> {
        let color = color.parse::<SerializableColor>().inspect_err(|err| log::warn!("{err}"))?;
        self.style.stroke_color = color;
        if self.transformer.attached().is_some() {
            self.snapshot();
            if let Some(shape) = self.selected_shape_mut() {
                shape.style_mut().stroke_color = color;
            }
        }
        self.needs_redraw = true;
        Ok(())
    }

    /// Set the current line width and apply it to the selection.
    pub fn set_line_width(&mut self, width: f64) {
        if !(width.is_finite() && width > 0.0) {
            log::warn!("ignoring line width {width}");
            return;
        }
        self.style.line_width = width;
        if self.transformer.attached().is_some() {
            self.snapshot();
            if let Some(shape) = self.selected_shape_mut() {
                shape.style_mut().line_width = width;
            }
        }
        self.needs_redraw = true;
    }

    /// Remove the selected shape. Returns whether anything was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.transformer.attached() else {
            return false;
        };
        self.snapshot();
        self.shapes.retain(|s| s.id() != id);
        self.select(None);
        log::debug!("deleted shape {id}");
        true
    }

    /// Step back one snapshot. Returns whether the shapes changed.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.history.undo(&self.shapes) else {
            return false;
        };
        self.shapes = previous;
        self.interaction = Interaction::Idle;
        self.select(None);
        true
    }

    /// Step forward one snapshot. Returns whether the shapes changed.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.history.redo(&self.shapes) else {
            return false;
        };
        self.shapes = next;
        self.interaction = Interaction::Idle;
        self.select(None);
        true
    }

    /// Remove every shape (undoable).
    pub fn reset(&mut self) {
        self.snapshot();
        self.shapes.clear();
        self.interaction = Interaction::Idle;
        self.select(None);
        log::debug!("canvas reset");
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    // --- pointer ---

    pub fn pointer_down(&mut self, point: Point) {
        if self.text_edit.is_some() {
            self.commit_open_text();
        }
        self.pointer = Some(point);
        self.needs_redraw = true;

        match self.tool {
            ToolKind::Text => {
                self.text_edit = Some(TextEditSession {
                    target: None,
                    position: point,
                    text: String::new(),
                    color: self.style.stroke_color,
                    font_size: self.config.font_size,
                    font_family: self.config.font_family.clone(),
                });
            }
            ToolKind::Select => self.begin_select_gesture(point),
            tool => self.begin_drawing(tool, point),
        }
    }

    fn begin_select_gesture(&mut self, point: Point) {
        match self.transformer.hit_test(&self.shapes, point) {
            HandleHit::Corner(corner) => {
                self.snapshot();
                self.interaction = Interaction::Resizing { corner };
                return;
            }
            HandleHit::Inside => {
                self.snapshot();
                self.interaction = Interaction::Dragging { last: point };
                return;
            }
            HandleHit::Outside => {}
        }

        let found = self.shape_at(point).map(Shape::id);
        self.select(found);
        if found.is_some() {
            self.snapshot();
            self.interaction = Interaction::Dragging { last: point };
        } else {
            self.interaction = Interaction::Idle;
        }
    }

    fn begin_drawing(&mut self, tool: ToolKind, point: Point) {
        self.snapshot();
        self.select(None);

        let style = self.style;
        let shape = match tool {
            ToolKind::Rectangle => Shape::Rectangle(Rectangle::new(point, 0.0, 0.0).with_style(style)),
            ToolKind::Ellipse => Shape::Ellipse(Ellipse::new(point, 0.0, 0.0).with_style(style)),
            ToolKind::Arrow => Shape::Arrow(Arrow::new(point, point).with_style(style)),
            ToolKind::Pen => Shape::Freehand(Freehand::new(point).with_style(style)),
            ToolKind::Mosaic => {
                let pattern = self
                    .patterns
                    .as_mut()
                    .and_then(|provider| provider.create_pattern(&self.shapes));
                if pattern.is_none() {
                    log::debug!("mosaic stroke without a pattern");
                }
                let width = style.line_width * self.config.mosaic_width_factor;
                Shape::Pixelate(Pixelate::new(point, pattern).with_style(ShapeStyle { line_width: width, ..style }))
            }
            ToolKind::Select | ToolKind::Text => return,
        };
        log::debug!("drawing {} {}", shape.kind_name(), shape.id());
        self.interaction = Interaction::Drawing { id: shape.id() };
        self.shapes.push(shape);
    }

    pub fn pointer_move(&mut self, point: Point) {
        self.pointer = Some(point);
        self.needs_redraw = true;

        match self.interaction {
            Interaction::Idle => {}
            Interaction::Dragging { last } => {
                let delta = point - last;
                if let Some(shape) = self.selected_shape_mut() {
                    shape.move_by(delta.x, delta.y);
                }
                self.interaction = Interaction::Dragging { last: point };
            }
            Interaction::Resizing { corner } => {
                if let Some(shape) = self.selected_shape_mut() {
                    shape.resize_from_corner(corner, point);
                }
            }
            Interaction::Drawing { id } => match self.get_shape_mut(id) {
                Some(Shape::Freehand(freehand)) => freehand.add_point(point),
                Some(Shape::Pixelate(brush)) => brush.add_point(point),
                Some(shape) => shape.resize(point),
                None => self.interaction = Interaction::Idle,
            },
        }
    }

    /// End the current gesture.
    pub fn pointer_up(&mut self) {
        let target = match self.interaction {
            Interaction::Drawing { id } => Some(id),
            Interaction::Resizing { .. } => self.transformer.attached(),
            Interaction::Dragging { .. } | Interaction::Idle => None,
        };
        if let Some(shape) = target.and_then(|id| self.get_shape_mut(id)) {
            shape.normalize();
        }
        self.interaction = Interaction::Idle;
        self.needs_redraw = true;
    }

    /// The pointer left the canvas; hides the brush cursor.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.needs_redraw = true;
    }

    /// Open an edit session on the topmost text block under `point`.
    pub fn double_click(&mut self, point: Point) {
        if self.text_edit.is_some() {
            self.commit_open_text();
        }
        let Some(text) = self
            .shapes
            .iter()
            .rev()
            .find(|s| s.as_text().is_some() && s.hit_test(point))
            .and_then(Shape::as_text)
        else {
            return;
        };
        log::debug!("editing text {}", text.id);
        self.text_edit = Some(TextEditSession {
            target: Some(text.id),
            position: text.position,
            text: text.content.clone(),
            color: text.style.stroke_color,
            font_size: text.font_size,
            font_family: text.font_family.clone(),
        });
        self.needs_redraw = true;
    }

    // --- text editing ---

    /// Mirror the boundary input's current value into the open session.
    pub fn update_text_edit(&mut self, value: &str) {
        if let Some(session) = &mut self.text_edit {
            session.text = value.to_string();
        }
    }

    /// Drop the open session without applying it.
    pub fn cancel_text_edit(&mut self) {
        if self.text_edit.take().is_some() {
            self.needs_redraw = true;
        }
    }

    fn commit_open_text(&mut self) {
        let value = self.text_edit.as_ref().map(|s| s.text.clone()).unwrap_or_default();
        self.commit_text(&value);
    }

    /// Apply the open session with `value`.
    ///
    /// Blank input removes an edited block and discards a new one. An edited
    /// block whose text is unchanged leaves history untouched.
    pub fn commit_text(&mut self, value: &str) {
        let Some(session) = self.text_edit.take() else {
            return;
        };
        self.needs_redraw = true;

        let blank = value.trim().is_empty();
        match session.target {
            Some(id) if blank => {
                if self.get_shape(id).is_none() {
                    log::debug!("edited text {id} is gone, nothing to remove");
                    return;
                }
                self.snapshot();
                self.shapes.retain(|s| s.id() != id);
                if self.transformer.attached() == Some(id) {
                    self.select(None);
                }
                log::debug!("removed emptied text {id}");
            }
            Some(id) => {
                let unchanged = self
                    .get_shape(id)
                    .and_then(Shape::as_text)
                    .is_none_or(|text| text.content == value);
                if unchanged {
                    return;
                }
                self.snapshot();
                if let Some(text) = self.get_shape_mut(id).and_then(Shape::as_text_mut) {
                    text.set_content(value.to_string());
                }
            }
            None if blank => {}
            None => {
                self.snapshot();
                let text = Text::new(session.position, value.to_string())
                    .with_style(self.style)
                    .with_font(session.font_size, session.font_family);
                log::debug!("created text {}", text.id);
                self.shapes.push(Shape::Text(text));
            }
        }
    }

    // --- rendering ---

    fn edited_id(&self) -> Option<ShapeId> {
        self.text_edit.as_ref().and_then(|s| s.target)
    }

    /// Draw the interactive view: background, shapes, selection overlay and brush cursor.
    pub fn render(&self, surface: &mut dyn Surface) {
        let edited = self.edited_id();
        surface.draw_background(&self.background);
        for shape in &self.shapes {
            if edited.is_some_and(|id| id == shape.id()) {
                continue;
            }
            shape.draw(surface);
        }

        if edited.is_none() || edited != self.transformer.attached() {
            self.transformer.draw(&self.shapes, surface);
        }

        if let (ToolKind::Mosaic, Some(pointer)) = (self.tool, self.pointer) {
            let outline = Circle::new(pointer, self.style.line_width).to_path(0.1);
            surface.save();
            surface.stroke_path(&outline, BRUSH_CURSOR_COLOR.into(), &Stroke::new(1.0));
            surface.restore();
        }
    }

    /// Draw background and shapes only, for saving the annotated image.
    pub fn render_for_export(&self, surface: &mut dyn Surface) {
        surface.draw_background(&self.background);
        for shape in &self.shapes {
            shape.draw(surface);
        }
    }
}
