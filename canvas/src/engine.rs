use serde_json::Value;
use time::OffsetDateTime;

use crate::doc::{CanvasSize, DocError, Trajectory};
use crate::input::{Mode, ModeKind, SessionEvent};
use crate::persist::{self, Document};
use crate::ruler::{self, Measurement};
use crate::units::Point;

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from handlers for the host to process.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The visible scene changed and should be redrawn.
    RenderNeeded,
    /// The trajectory now holds this many points.
    PointCountChanged(usize),
    /// New ruler label, e.g. `"1.00 cm"`.
    RulerDistance(String),
    /// The canvas was resized to these whole-pixel dimensions.
    CanvasResized { width_px: u32, height_px: u32 },
}

/// One drawing session: canvas, trajectory and the active mode.
///
/// All state a UI would otherwise keep in globals lives here; handlers mutate
/// it and report what the host has to update.
#[derive(Debug, Clone, Default)]
pub struct Session {
    canvas: CanvasSize,
    trajectory: Trajectory,
    mode: Mode,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session on a canvas of the given size.
    #[must_use]
    pub fn with_canvas(canvas: CanvasSize) -> Self {
        Self { canvas, ..Self::default() }
    }

    // --- Pointer input ---

    /// Pointer pressed at `pt` (canvas pixels).
    pub fn on_pointer_down(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.mode {
            Mode::Draw { stroking } => {
                *stroking = true;
                self.push_point(pt)
            }
            Mode::Ruler { start, end, dragging, moved } => {
                if start.is_some() && end.is_none() && !*dragging {
                    // Second click completes a click-click measurement.
                    *end = Some(pt);
                    self.ruler_update()
                } else {
                    *start = Some(pt);
                    *end = None;
                    *dragging = true;
                    *moved = false;
                    vec![Action::RulerDistance(ruler::EMPTY_LABEL.to_string()), Action::RenderNeeded]
                }
            }
        }
    }

    /// Pointer moved to `pt`.
    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.mode {
            Mode::Draw { stroking: true } => self.push_point(pt),
            Mode::Ruler { end, dragging: true, moved, .. } => {
                *end = Some(pt);
                *moved = true;
                self.ruler_update()
            }
            _ => Vec::new(),
        }
    }

    /// Pointer released at `pt`.
    ///
    /// A release ends a drag when the pointer moved after the press or came up
    /// somewhere else; the release point becomes `end` even if it equals
    /// `start`. Otherwise the press was a click and `start` waits for a second
    /// click.
    pub fn on_pointer_up(&mut self, pt: Point) -> Vec<Action> {
        match &mut self.mode {
            Mode::Draw { stroking } => {
                *stroking = false;
                Vec::new()
            }
            Mode::Ruler { start: Some(s), end, dragging, moved } if *dragging => {
                *dragging = false;
                if *moved || *s != pt {
                    *end = Some(pt);
                    self.ruler_update()
                } else {
                    Vec::new()
                }
            }
            Mode::Ruler { .. } => Vec::new(),
        }
    }

    /// Pointer left the canvas. Ends a stroke; ruler state is unaffected.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if let Mode::Draw { stroking } = &mut self.mode {
            *stroking = false;
        }
        Vec::new()
    }

    // --- Commands ---

    /// Switch tools. Any gesture in progress and any ruler endpoints are dropped.
    pub fn set_mode(&mut self, kind: ModeKind) -> Vec<Action> {
        self.mode = Mode::idle(kind);
        vec![Action::RulerDistance(ruler::EMPTY_LABEL.to_string()), Action::RenderNeeded]
    }

    /// Empty the trajectory and reset the ruler. Confirmation is the host's job.
    pub fn clear(&mut self) -> Vec<Action> {
        self.trajectory.clear();
        self.mode = Mode::idle(self.mode.kind());
        vec![
            Action::PointCountChanged(0),
            Action::RulerDistance(ruler::EMPTY_LABEL.to_string()),
            Action::RenderNeeded,
        ]
    }

    /// Apply a manually entered canvas size.
    ///
    /// # Errors
    ///
    /// [`DocError::CanvasSizeOutOfRange`]; the session is left unchanged.
    pub fn apply_canvas_size(&mut self, width_cm: f64, height_cm: f64) -> Result<Vec<Action>, DocError> {
        self.canvas = CanvasSize::new(width_cm, height_cm)?;
        Ok(self.resized())
    }

    /// Build the document to save.
    ///
    /// # Errors
    ///
    /// [`DocError::EmptyTrajectory`] when nothing has been drawn.
    pub fn save(&self, created_at: OffsetDateTime) -> Result<Document, DocError> {
        persist::serialize(&self.canvas, &self.trajectory, created_at)
    }

    /// Replace the trajectory (and canvas size, if given) from a parsed document.
    ///
    /// # Errors
    ///
    /// Any [`persist::deserialize`] error. Nothing changes on failure.
    pub fn load(&mut self, value: &Value) -> Result<Vec<Action>, DocError> {
        let (canvas, trajectory) = persist::deserialize(value, self.canvas)?;
        self.canvas = canvas;
        self.trajectory = trajectory;
        let mut actions = self.resized();
        actions.insert(0, Action::PointCountChanged(self.trajectory.len()));
        Ok(actions)
    }

    /// Replace the trajectory with points read from another source (e.g. a
    /// CAD file). The canvas size is kept.
    pub fn load_trajectory(&mut self, trajectory: Trajectory) -> Vec<Action> {
        self.trajectory = trajectory;
        vec![Action::PointCountChanged(self.trajectory.len()), Action::RenderNeeded]
    }

    /// Parse `text` as JSON and [`load`](Self::load) it.
    ///
    /// # Errors
    ///
    /// [`DocError::Json`] for malformed input, otherwise as [`load`](Self::load).
    pub fn load_str(&mut self, text: &str) -> Result<Vec<Action>, DocError> {
        let value: Value = serde_json::from_str(text)?;
        self.load(&value)
    }

    /// Dispatch one scripted event.
    ///
    /// # Errors
    ///
    /// Only [`SessionEvent::Resize`] can fail.
    pub fn apply(&mut self, event: &SessionEvent) -> Result<Vec<Action>, DocError> {
        let actions = match *event {
            SessionEvent::Down { x, y } => self.on_pointer_down(Point::new(x, y)),
            SessionEvent::Move { x, y } => self.on_pointer_move(Point::new(x, y)),
            SessionEvent::Up { x, y } => self.on_pointer_up(Point::new(x, y)),
            SessionEvent::Leave => self.on_pointer_leave(),
            SessionEvent::Mode { mode } => self.set_mode(mode),
            SessionEvent::Clear => self.clear(),
            SessionEvent::Resize { width, height } => self.apply_canvas_size(width, height)?,
        };
        Ok(actions)
    }

    // --- Queries ---

    #[must_use]
    pub fn canvas(&self) -> CanvasSize {
        self.canvas
    }

    #[must_use]
    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    #[must_use]
    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    /// The current ruler measurement, if one is complete or being dragged.
    #[must_use]
    pub fn measurement(&self) -> Option<Measurement> {
        self.mode.measurement()
    }

    /// Ruler label as it should currently be displayed.
    #[must_use]
    pub fn ruler_label(&self) -> String {
        self.measurement().map_or_else(|| ruler::EMPTY_LABEL.to_string(), |m| m.label())
    }

    // --- Internals ---

    fn push_point(&mut self, pt: Point) -> Vec<Action> {
        self.trajectory.add_point(pt);
        vec![Action::PointCountChanged(self.trajectory.len()), Action::RenderNeeded]
    }

    fn ruler_update(&self) -> Vec<Action> {
        vec![Action::RulerDistance(self.ruler_label()), Action::RenderNeeded]
    }

    fn resized(&self) -> Vec<Action> {
        vec![
            Action::CanvasResized { width_px: self.canvas.width_px(), height_px: self.canvas.height_px() },
            Action::RenderNeeded,
        ]
    }
}
