use crate::editor::MarkerEditor;
use crate::hit_test;
use crate::input::{PointerButton, PointerEvent};
use crate::models::ScreenPoint;
use crate::store::MarkerStore;
use crate::viewport::{self, Viewport};

#[derive(Debug, Clone, PartialEq)]
pub enum InteractionState {
    Idle,
    Panning {
        anchor_pointer: ScreenPoint,
        anchor_offset: ScreenPoint,
    },
    /// Holding the editor here makes "one editor at a time" structural.
    EditorOpen(Box<MarkerEditor>),
}

/// What a pointer event turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    PanStarted,
    Panned,
    PanEnded,
    Zoomed,
    EditorOpened,
    EditorDismissed,
}

/// Turns pointer events into pan, zoom and editor intents.
///
/// Panning and editing are mutually exclusive: a context trigger during a
/// drag is dropped, and a primary press with the editor open dismisses it
/// instead of starting a drag. Wheel zoom works in every state.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionController {
    state: InteractionState,
}

impl Default for InteractionController {
    fn default() -> Self {
        InteractionController {
            state: InteractionState::Idle,
        }
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, InteractionState::Panning { .. })
    }

    pub fn editor(&self) -> Option<&MarkerEditor> {
        match &self.state {
            InteractionState::EditorOpen(editor) => Some(&**editor),
            _ => None,
        }
    }

    pub fn editor_mut(&mut self) -> Option<&mut MarkerEditor> {
        match &mut self.state {
            InteractionState::EditorOpen(editor) => Some(&mut **editor),
            _ => None,
        }
    }

    /// Close the editor (cancel, overlay click, or a finished request).
    pub fn dismiss_editor(&mut self) -> bool {
        if self.editor().is_some() {
            self.state = InteractionState::Idle;
            true
        } else {
            false
        }
    }

    pub fn handle(
        &mut self,
        event: PointerEvent,
        viewport: &mut Viewport,
        markers: &MarkerStore,
    ) -> Outcome {
        match event {
            PointerEvent::Press {
                button: PointerButton::Primary,
                position,
            } => match self.state {
                InteractionState::Idle => {
                    self.state = InteractionState::Panning {
                        anchor_pointer: position,
                        anchor_offset: viewport.offset(),
                    };
                    Outcome::PanStarted
                }
                InteractionState::EditorOpen(_) => {
                    self.state = InteractionState::Idle;
                    Outcome::EditorDismissed
                }
                InteractionState::Panning { .. } => Outcome::Ignored,
            },
            PointerEvent::Press { .. } => Outcome::Ignored,
            PointerEvent::Move { position } => match self.state {
                InteractionState::Panning {
                    anchor_pointer,
                    anchor_offset,
                } => {
                    // Recompute from the drag anchor so missed moves cannot drift.
                    viewport.set_offset(anchor_offset);
                    viewport.pan_by(position.delta_from(anchor_pointer));
                    Outcome::Panned
                }
                _ => Outcome::Ignored,
            },
            PointerEvent::Release {
                button: PointerButton::Primary,
                ..
            }
            | PointerEvent::Leave => {
                if self.is_panning() {
                    self.state = InteractionState::Idle;
                    Outcome::PanEnded
                } else {
                    Outcome::Ignored
                }
            }
            PointerEvent::Release { .. } => Outcome::Ignored,
            PointerEvent::Wheel { position, delta_y } => {
                if !viewport.zoom_at(position, viewport::wheel_zoom_delta(delta_y)) {
                    return Outcome::Ignored;
                }
                // Re-anchor an ongoing drag, or the next move would undo the zoom.
                if let InteractionState::Panning {
                    anchor_pointer,
                    anchor_offset,
                } = &mut self.state
                {
                    *anchor_pointer = position;
                    *anchor_offset = viewport.offset();
                }
                Outcome::Zoomed
            }
            PointerEvent::ContextTrigger { position } => {
                if self.is_panning() {
                    return Outcome::Ignored;
                }
                let editor = match hit_test::find_marker_at(position, markers, viewport) {
                    Some(marker) => MarkerEditor::edit(marker),
                    None => MarkerEditor::create(viewport.screen_to_map(position)),
                };
                tracing::debug!(
                    marker_id = ?editor.marker_id(),
                    x = editor.position().x,
                    y = editor.position().y,
                    "opening marker editor"
                );
                self.state = InteractionState::EditorOpen(Box::new(editor));
                Outcome::EditorOpened
            }
        }
    }
}
