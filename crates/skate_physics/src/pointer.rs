//! Pointer drag
//!
//! Pressing on a board grabs it at the pressed point. While held, every physics step
//! steers the grabbed point toward the pointer, correcting `stiffness` of the remaining
//! gap per step. Wheel input is never consumed, so page scrolling keeps working over the
//! footer.

use crate::backend::{BodyHandle, PhysicsBackend};
use skate_core::{PointerButton, PointerEvent, Vec2};
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Grab {
    body: BodyHandle,
    /// Grabbed point in body space
    anchor: Vec2,
}

/// Spring-like drag bound to host pointer input
#[derive(Clone, Debug)]
pub struct PointerDrag {
    stiffness: f32,
    pointer: Option<Vec2>,
    grab: Option<Grab>,
}

impl PointerDrag {
    pub fn new(stiffness: f32) -> Self {
        Self {
            stiffness,
            pointer: None,
            grab: None,
        }
    }

    /// Feed a pointer event. Returns whether the drag consumed it.
    pub fn handle(&mut self, event: &PointerEvent, engine: &dyn PhysicsBackend) -> bool {
        match *event {
            PointerEvent::Wheel { .. } => false,
            PointerEvent::Moved { x, y } => {
                self.pointer = Some(Vec2::new(x, y));
                self.grab.is_some()
            }
            PointerEvent::Pressed {
                button: PointerButton::Primary,
                x,
                y,
            } => {
                let point = Vec2::new(x, y);
                self.pointer = Some(point);
                self.grab = engine.body_at_point(point).and_then(|body| {
                    engine.pose(body).map(|pose| Grab {
                        body,
                        anchor: pose.to_local(point),
                    })
                });
                if self.grab.is_some() {
                    trace!(x, y, "board grabbed");
                }
                self.grab.is_some()
            }
            PointerEvent::Released {
                button: PointerButton::Primary,
                ..
            } => self.grab.take().is_some(),
            PointerEvent::Left => {
                self.pointer = None;
                self.grab.take().is_some()
            }
            _ => false,
        }
    }

    /// Steer the grabbed body; call once before each physics step of `dt`
    pub fn apply(&mut self, engine: &mut dyn PhysicsBackend, dt: f32) {
        let (Some(grab), Some(pointer)) = (self.grab, self.pointer) else {
            return;
        };
        let Some(pose) = engine.pose(grab.body) else {
            // The body went away under the pointer
            self.grab = None;
            return;
        };
        if dt <= 0.0 {
            return;
        }
        let error = pointer - pose.to_world(grab.anchor);
        engine.set_linear_velocity(grab.body, error * (self.stiffness / dt));
    }

    pub fn is_dragging(&self) -> bool {
        self.grab.is_some()
    }

    pub fn grabbed(&self) -> Option<BodyHandle> {
        self.grab.map(|g| g.body)
    }

    /// Drop any grab and forget the pointer
    pub fn reset(&mut self) {
        self.grab = None;
        self.pointer = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BoardBody, Pose, RapierBackend};

    fn world_with_board() -> (RapierBackend, BodyHandle) {
        let mut engine = RapierBackend::new();
        let board = engine.add_board(&BoardBody {
            pose: Pose::new(Vec2::new(200.0, 200.0), 0.0),
            width: 80.0,
            height: 285.0,
            corner_radius: 40.0,
            restitution: 0.8,
            friction: 0.005,
        });
        (engine, board)
    }

    #[test]
    fn test_wheel_is_never_captured() {
        let (engine, _) = world_with_board();
        let mut drag = PointerDrag::new(0.2);
        let wheel = PointerEvent::Wheel {
            delta_x: 0.0,
            delta_y: 120.0,
        };
        assert!(!drag.handle(&wheel, &engine));
        drag.handle(
            &PointerEvent::Pressed {
                button: PointerButton::Primary,
                x: 200.0,
                y: 200.0,
            },
            &engine,
        );
        assert!(!drag.handle(&wheel, &engine));
        assert!(drag.is_dragging());
    }

    #[test]
    fn test_press_on_empty_space_grabs_nothing() {
        let (engine, _) = world_with_board();
        let mut drag = PointerDrag::new(0.2);
        let pressed = drag.handle(
            &PointerEvent::Pressed {
                button: PointerButton::Primary,
                x: 10.0,
                y: 10.0,
            },
            &engine,
        );
        assert!(!pressed);
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_drag_moves_board_toward_pointer() {
        let (mut engine, board) = world_with_board();
        let mut drag = PointerDrag::new(0.2);
        drag.handle(
            &PointerEvent::Pressed {
                button: PointerButton::Primary,
                x: 200.0,
                y: 200.0,
            },
            &engine,
        );
        assert_eq!(drag.grabbed(), Some(board));
        drag.handle(&PointerEvent::Moved { x: 400.0, y: 200.0 }, &engine);

        for _ in 0..60 {
            drag.apply(&mut engine, 1.0 / 60.0);
            engine.step(1.0 / 60.0);
        }
        let x = engine.pose(board).unwrap().position.x;
        assert!(x > 350.0, "board at {x}");

        assert!(drag.handle(
            &PointerEvent::Released {
                button: PointerButton::Primary,
                x: 400.0,
                y: 200.0
            },
            &engine
        ));
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_removed_body_drops_grab() {
        let (mut engine, board) = world_with_board();
        let mut drag = PointerDrag::new(0.2);
        drag.handle(
            &PointerEvent::Pressed {
                button: PointerButton::Primary,
                x: 200.0,
                y: 200.0,
            },
            &engine,
        );
        engine.remove(board);
        drag.apply(&mut engine, 1.0 / 60.0);
        assert!(!drag.is_dragging());
    }
}
