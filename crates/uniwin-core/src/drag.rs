use crate::Vec2;
use crate::input::{FrameInput, Touch, TouchPhase};

/// Which input started the current drag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragSource {
    #[default]
    Mouse,
    Touch,
}

/// Tracks drag-to-move for a single pointer at a time.
///
/// The mouse starts a drag immediately. A new touch is only parked as
/// pending; the controller hit-tests it and calls
/// [`claim_touch`](Self::claim_touch) if it landed on content.
#[derive(Debug, Default)]
pub struct DragTracker {
    dragging: bool,
    source: DragSource,
    start: Vec2,
    active_touch: Option<u32>,
    pending_touch: Option<Touch>,
}

impl DragTracker {
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn source(&self) -> DragSource {
        self.source
    }

    /// Takes the touch that began this frame, if any.
    pub fn take_pending_touch(&mut self) -> Option<Touch> {
        self.pending_touch.take()
    }

    /// Makes touch `id` the drag source from the next update on.
    pub fn claim_touch(&mut self, id: u32) {
        self.active_touch = Some(id);
    }

    pub fn cancel(&mut self) {
        self.dragging = false;
        self.active_touch = None;
        self.pending_touch = None;
    }

    /// Advances the drag by one frame.
    ///
    /// Returns the screen-space offset to add to the window position, or
    /// `None` when no drag is in progress. `blocked` stops any drag
    /// (disabled, full-screen or maximized).
    pub fn update(&mut self, input: &FrameInput, blocked: bool) -> Option<Vec2> {
        if blocked {
            self.dragging = false;
            return None;
        }

        let mouse = input.mouse;
        if mouse.primary_pressed && !mouse.secondary_held && !mouse.middle_held {
            self.start = input.pointer;
            self.dragging = true;
            self.source = DragSource::Mouse;
        }

        let touch = match self.active_touch {
            Some(id) => input
                .touches
                .iter()
                .find(|t| t.id == id && t.phase.is_down())
                .copied(),
            None => {
                if let Some(began) = input
                    .touches
                    .iter()
                    .find(|t| t.phase == TouchPhase::Began)
                {
                    self.pending_touch = Some(*began);
                }
                None
            }
        };

        if let Some(touch) = touch
            && !self.dragging
        {
            self.start = touch.position;
            self.dragging = true;
            self.source = DragSource::Touch;
        }

        let released = match self.source {
            DragSource::Mouse => !mouse.primary_held,
            DragSource::Touch => touch.is_none(),
        };
        if released {
            self.dragging = false;
            self.active_touch = None;
        }
        if !self.dragging {
            return None;
        }

        let current = match (self.source, touch) {
            (DragSource::Touch, Some(touch)) => touch.position,
            _ => input.pointer,
        };
        Some((current - self.start).ui_to_screen_delta())
    }
}
