//! Pointer gesture routing.
//!
//! Every pointer-down is classified once into a single exclusive gesture.
//! No other gesture can start until the active one ends.

use crate::component::{ComponentId, ComponentUpdate};
use crate::host::CanvasHost;
use crate::input::{Modifiers, MouseButton, PointerTarget};
use crate::selection::SelectionController;
use crate::viewport::Viewport;
use kurbo::{Point, Vec2};

/// Kind of gesture started by a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    /// Dragging the viewport.
    Pan,
    /// Dragging a component body.
    MoveComponent,
}

#[derive(Debug, Clone, PartialEq)]
enum Gesture {
    Pan {
        last: Point,
    },
    MoveComponent {
        id: ComponentId,
        /// Component position when the drag started.
        origin: Point,
        /// Accumulated world-space displacement.
        offset: Vec2,
        last: Point,
    },
}

/// Classifies pointer input and drives the active gesture.
#[derive(Debug, Clone, Default)]
pub struct GestureRouter {
    active: Option<Gesture>,
}

impl GestureRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kind of the active gesture, if any.
    pub fn active(&self) -> Option<GestureKind> {
        self.active.as_ref().map(|gesture| match gesture {
            Gesture::Pan { .. } => GestureKind::Pan,
            Gesture::MoveComponent { .. } => GestureKind::MoveComponent,
        })
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.active, Some(Gesture::Pan { .. }))
    }

    /// Position of the component being dragged, for rendering.
    pub fn drag_preview(&self) -> Option<(&ComponentId, Point)> {
        match &self.active {
            Some(Gesture::MoveComponent {
                id,
                origin,
                offset,
                ..
            }) => Some((id, *origin + *offset)),
            _ => None,
        }
    }

    /// Handle a pointer-down.
    ///
    /// 1. Middle, secondary, or primary+ctrl/cmd pans.
    /// 2. Primary on the background pans and clears the selection.
    /// 3. Primary on a component selects it (possibly completing a
    ///    connection) and starts dragging it.
    /// 4. Primary on a connection selects the connection.
    pub fn pointer_down(
        &mut self,
        position: Point,
        button: MouseButton,
        modifiers: Modifiers,
        target: &PointerTarget,
        selection: &mut SelectionController,
        host: &mut dyn CanvasHost,
    ) -> Option<GestureKind> {
        if self.active.is_some() {
            log::debug!("Ignoring {:?} press during active gesture", button);
            return None;
        }

        let wants_pan = match button {
            MouseButton::Middle | MouseButton::Secondary => true,
            MouseButton::Primary => modifiers.command(),
        };
        if wants_pan {
            return self.start_pan(position);
        }
        if !modifiers.is_empty() {
            return None;
        }

        match target {
            PointerTarget::Background => {
                selection.clear_selection();
                self.start_pan(position)
            }
            PointerTarget::Component(id) => {
                selection.select(id, host);
                let origin = host.component(id)?.position;
                self.active = Some(Gesture::MoveComponent {
                    id: id.clone(),
                    origin,
                    offset: Vec2::ZERO,
                    last: position,
                });
                Some(GestureKind::MoveComponent)
            }
            PointerTarget::Connection(id) => {
                selection.select_connection(id);
                None
            }
            PointerTarget::Other => None,
        }
    }

    /// Handle a pointer move. Deltas are taken from the previous move.
    pub fn pointer_move(&mut self, position: Point, viewport: &mut Viewport) {
        match &mut self.active {
            Some(Gesture::Pan { last }) => {
                viewport.pan(position - *last);
                *last = position;
            }
            Some(Gesture::MoveComponent { offset, last, .. }) => {
                *offset += (position - *last) / viewport.zoom();
                *last = position;
            }
            None => {}
        }
    }

    /// Handle pointer-up. Ends the active gesture.
    pub fn pointer_up(
        &mut self,
        position: Point,
        viewport: &mut Viewport,
        host: &mut dyn CanvasHost,
    ) {
        if self.active.is_some() {
            self.pointer_move(position, viewport);
        }
        self.finish(host);
    }

    /// Pointer left the canvas bounds. Treated like pointer-up.
    pub fn pointer_leave(&mut self, host: &mut dyn CanvasHost) {
        self.finish(host);
    }

    /// Abort the active gesture without emitting anything.
    pub fn cancel(&mut self) {
        if let Some(gesture) = self.active.take() {
            log::debug!("Gesture cancelled: {:?}", gesture);
        }
    }

    fn start_pan(&mut self, position: Point) -> Option<GestureKind> {
        self.active = Some(Gesture::Pan { last: position });
        log::debug!("Pan started at ({:.1}, {:.1})", position.x, position.y);
        Some(GestureKind::Pan)
    }

    fn finish(&mut self, host: &mut dyn CanvasHost) {
        match self.active.take() {
            Some(Gesture::MoveComponent {
                id,
                origin,
                offset,
                ..
            }) => {
                if offset.hypot2() > f64::EPSILON && host.has_component(&id) {
                    let position = origin + offset;
                    log::debug!("Moved {} to ({:.1}, {:.1})", id, position.x, position.y);
                    host.on_component_update(&id, ComponentUpdate::position(position));
                }
            }
            Some(Gesture::Pan { .. }) => log::debug!("Pan ended"),
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::RecordingHost;
    use crate::selection::SelectionMode;

    struct Fixture {
        router: GestureRouter,
        selection: SelectionController,
        host: RecordingHost,
        viewport: Viewport,
    }

    impl Fixture {
        fn new(ids: &[&str]) -> Self {
            Self {
                router: GestureRouter::new(),
                selection: SelectionController::new(),
                host: RecordingHost::with_components(ids),
                viewport: Viewport::new(),
            }
        }

        fn press_with(
            &mut self,
            button: MouseButton,
            modifiers: Modifiers,
            target: PointerTarget,
        ) -> Option<GestureKind> {
            self.router.pointer_down(
                Point::new(100.0, 100.0),
                button,
                modifiers,
                &target,
                &mut self.selection,
                &mut self.host,
            )
        }

        fn press(&mut self, target: PointerTarget) -> Option<GestureKind> {
            self.press_with(MouseButton::Primary, Modifiers::default(), target)
        }

        fn move_to(&mut self, x: f64, y: f64) {
            self.router.pointer_move(Point::new(x, y), &mut self.viewport);
        }

        fn release(&mut self, x: f64, y: f64) {
            self.router
                .pointer_up(Point::new(x, y), &mut self.viewport, &mut self.host);
        }
    }

    fn component(id: &str) -> PointerTarget {
        PointerTarget::Component(id.to_string())
    }

    #[test]
    fn test_pan_buttons() {
        let ctrl = Modifiers {
            ctrl: true,
            ..Modifiers::default()
        };
        let none = Modifiers::default();
        let cases = [
            (MouseButton::Middle, none, component("A")),
            (MouseButton::Secondary, none, component("A")),
            (MouseButton::Primary, ctrl, component("A")),
            (MouseButton::Primary, none, PointerTarget::Background),
        ];
        for (button, modifiers, target) in cases {
            let mut fixture = Fixture::new(&["A"]);
            let kind = fixture.press_with(button, modifiers, target);
            assert_eq!(kind, Some(GestureKind::Pan));
        }
    }

    #[test]
    fn test_other_modifiers_ignored() {
        let mut fixture = Fixture::new(&["A"]);
        let alt = Modifiers {
            alt: true,
            ..Modifiers::default()
        };
        let kind = fixture.press_with(MouseButton::Primary, alt, component("A"));
        assert!(kind.is_none());
        assert_eq!(fixture.selection.mode(), SelectionMode::Idle);
    }

    #[test]
    fn test_pan_uses_incremental_deltas() {
        let mut fixture = Fixture::new(&[]);
        fixture.press_with(
            MouseButton::Middle,
            Modifiers::default(),
            PointerTarget::Background,
        );

        fixture.move_to(110.0, 105.0);
        fixture.move_to(130.0, 100.0);
        fixture.release(130.0, 100.0);

        assert_eq!(fixture.viewport.pan, Vec2::new(30.0, 0.0));
        assert!(fixture.router.active().is_none());
    }

    #[test]
    fn test_gestures_are_exclusive() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.press_with(
            MouseButton::Middle,
            Modifiers::default(),
            PointerTarget::Background,
        );
        let second = fixture.press(component("A"));

        assert!(second.is_none());
        assert!(fixture.router.is_panning());
        assert_eq!(fixture.selection.mode(), SelectionMode::Idle);
    }

    #[test]
    fn test_leave_ends_pan() {
        let mut fixture = Fixture::new(&[]);
        fixture.press(PointerTarget::Background);
        fixture.router.pointer_leave(&mut fixture.host);
        assert!(fixture.router.active().is_none());

        fixture.move_to(500.0, 500.0);
        assert_eq!(fixture.viewport.pan, Vec2::ZERO);
    }

    #[test]
    fn test_background_press_clears_selection() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.selection.start_connection("A");
        fixture.press(PointerTarget::Background);
        assert_eq!(fixture.selection.mode(), SelectionMode::Idle);
    }

    #[test]
    fn test_bubbled_press_keeps_selection() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.selection.select("A", &mut fixture.host);
        let kind = fixture.press(PointerTarget::Other);
        assert!(kind.is_none());
        assert_eq!(fixture.selection.mode(), SelectionMode::Selected("A"));
    }

    #[test]
    fn test_component_press_selects_and_connects() {
        let mut fixture = Fixture::new(&["A", "B"]);
        fixture.selection.start_connection("A");
        let kind = fixture.press(component("B"));
        fixture.release(100.0, 100.0);

        assert_eq!(kind, Some(GestureKind::MoveComponent));
        assert_eq!(fixture.host.added_connections.len(), 1);
        assert_eq!(fixture.selection.mode(), SelectionMode::Selected("B"));
        assert!(fixture.host.component_updates.is_empty());
    }

    #[test]
    fn test_unknown_component_press_starts_nothing() {
        let mut fixture = Fixture::new(&["A"]);
        assert!(fixture.press(component("ghost")).is_none());
        assert!(fixture.router.active().is_none());
        assert_eq!(fixture.selection.mode(), SelectionMode::Idle);
    }

    #[test]
    fn test_component_drag_emits_single_update() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.viewport.set_zoom(2.0);
        fixture.press(component("A"));

        fixture.move_to(120.0, 100.0);
        let preview = fixture.router.drag_preview().map(|(_, p)| p);
        assert_eq!(preview, Some(Point::new(10.0, 0.0)));
        fixture.move_to(140.0, 120.0);
        fixture.release(140.0, 120.0);

        assert_eq!(fixture.host.component_updates.len(), 1);
        let (id, update) = &fixture.host.component_updates[0];
        assert_eq!(id, "A");
        assert_eq!(update.position, Some(Point::new(20.0, 10.0)));
    }

    #[test]
    fn test_connection_press_selects_connection() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.selection.select("A", &mut fixture.host);
        fixture.press(PointerTarget::Connection("c1".to_string()));

        let selected = fixture.selection.selected_connection().map(String::as_str);
        assert_eq!(selected, Some("c1"));
        assert!(fixture.selection.selected_component().is_none());
    }

    #[test]
    fn test_cancel_drops_drag() {
        let mut fixture = Fixture::new(&["A"]);
        fixture.press(component("A"));
        fixture.move_to(150.0, 150.0);
        fixture.router.cancel();
        fixture.release(150.0, 150.0);
        assert!(fixture.host.component_updates.is_empty());
    }
}
