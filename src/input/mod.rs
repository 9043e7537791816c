use std::collections::HashSet;
use winit::event::ElementState;
pub use winit::keyboard::KeyCode;

/// Something a held key asks the player controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Forward,
    Back,
    StrafeLeft,
    StrafeRight,
    Jump,
    Descend,
    Fly,
    Sprint,
    Pause,
    ViewFarther,
    ViewNearer,
}

impl Action {
    /// Default key bindings
    pub fn for_key(key: KeyCode) -> Option<Self> {
        let action = match key {
            KeyCode::KeyW => Action::Forward,
            KeyCode::KeyS => Action::Back,
            KeyCode::KeyA => Action::StrafeLeft,
            KeyCode::KeyD => Action::StrafeRight,
            KeyCode::Space => Action::Jump,
            KeyCode::KeyC => Action::Descend,
            KeyCode::ControlLeft => Action::Fly,
            KeyCode::ShiftLeft => Action::Sprint,
            KeyCode::Escape => Action::Pause,
            KeyCode::ArrowUp => Action::ViewFarther,
            KeyCode::ArrowDown => Action::ViewNearer,
            _ => return None,
        };
        Some(action)
    }
}

/// Held actions and pointer motion gathered from window events between ticks
#[derive(Debug, Default)]
pub struct InputState {
    held: HashSet<Action>,
    look_delta: (f32, f32),
    cursor_locked: bool,
    last_pointer: Option<(f32, f32)>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a key event; keys without a binding are ignored
    pub fn process_key(&mut self, key: KeyCode, state: ElementState) {
        let Some(action) = Action::for_key(key) else {
            return;
        };
        match state {
            ElementState::Pressed => {
                self.held.insert(action);
            }
            ElementState::Released => {
                self.held.remove(&action);
            }
        }
    }

    /// Accumulate raw pointer motion into the look delta for the next tick
    pub fn process_mouse_motion(&mut self, delta: (f64, f64)) {
        let (dx, dy) = (delta.0 as f32, delta.1 as f32);

        // Some X11 setups report absolute positions through the raw motion event
        if dx.abs() <= 100.0 && dy.abs() <= 100.0 {
            self.look_delta.0 += dx;
            self.look_delta.1 += dy;
            return;
        }

        if let Some((last_x, last_y)) = self.last_pointer.replace((dx, dy)) {
            let (step_x, step_y) = (dx - last_x, dy - last_y);
            if step_x.abs() < 100.0 && step_y.abs() < 100.0 {
                self.look_delta.0 += step_x;
                self.look_delta.1 += step_y;
            }
        }
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Forget pointer history, e.g. after the cursor was re-grabbed
    pub fn reset_mouse_tracking(&mut self) {
        self.last_pointer = None;
        self.look_delta = (0.0, 0.0);
    }

    /// Drop all held actions, e.g. when the window loses focus
    pub fn release_all(&mut self) {
        self.held.clear();
        self.reset_mouse_tracking();
    }

    pub fn set_cursor_locked(&mut self, locked: bool) {
        self.cursor_locked = locked;
    }

    pub fn is_cursor_locked(&self) -> bool {
        self.cursor_locked
    }

    /// Intent snapshot for one tick
    ///
    /// The pointer delta is consumed: ticks later in the same frame see zero
    /// look input until new motion arrives.
    pub fn take_tick_input(&mut self) -> TickInput {
        let axis = |positive: Action, negative: Action| {
            self.is_held(positive) as i8 as f32 - self.is_held(negative) as i8 as f32
        };

        TickInput {
            forward: axis(Action::Forward, Action::Back),
            strafe: axis(Action::StrafeRight, Action::StrafeLeft),
            jump: self.is_held(Action::Jump),
            descend: self.is_held(Action::Descend),
            fly: self.is_held(Action::Fly),
            sprint: self.is_held(Action::Sprint),
            pause: self.is_held(Action::Pause),
            view_distance: axis(Action::ViewFarther, Action::ViewNearer),
            look_delta: std::mem::take(&mut self.look_delta),
        }
    }
}

/// Movement intents for a single fixed tick
///
/// Axis fields are signed accumulators in {-1, 0, +1}: `forward` is +1 for
/// W, `strafe` is +1 for D, `view_distance` is +1 for ArrowUp.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    pub forward: f32,
    pub strafe: f32,
    pub jump: bool,
    pub descend: bool,
    /// Lets `jump` fire while airborne
    pub fly: bool,
    pub sprint: bool,
    pub pause: bool,
    pub view_distance: f32,
    /// Pointer motion in pixels since the previous tick
    pub look_delta: (f32, f32),
}
