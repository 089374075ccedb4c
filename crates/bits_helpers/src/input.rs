use bevy::prelude::*;

/// What the primary pointer (left mouse button or first touch) did this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    Pressed(Vec2),
    Held(Vec2),
    Released(Vec2),
    /// The press ended or continued somewhere the window cannot see
    Lost,
}

impl PointerSample {
    pub const fn position(self) -> Option<Vec2> {
        match self {
            Self::Pressed(position) | Self::Held(position) | Self::Released(position) => {
                Some(position)
            }
            Self::Lost => None,
        }
    }

    const fn with_position(self, position: Vec2) -> Self {
        match self {
            Self::Pressed(_) => Self::Pressed(position),
            Self::Held(_) => Self::Held(position),
            Self::Released(_) => Self::Released(position),
            Self::Lost => Self::Lost,
        }
    }
}

/// Samples the primary pointer in window coordinates, `None` when it is idle.
pub fn pointer_screen_sample(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
) -> Option<PointerSample> {
    let cursor = || windows.get_single().ok().and_then(Window::cursor_position);
    let mouse = |sample: fn(Vec2) -> PointerSample| Some(cursor().map_or(PointerSample::Lost, sample));

    if button_input.just_pressed(MouseButton::Left) {
        mouse(PointerSample::Pressed)
    } else if button_input.just_released(MouseButton::Left) {
        mouse(PointerSample::Released)
    } else if button_input.pressed(MouseButton::Left) {
        mouse(PointerSample::Held)
    } else if let Some(touch) = touch_input.iter_just_pressed().next() {
        Some(PointerSample::Pressed(touch.position()))
    } else if let Some(touch) = touch_input.iter_just_released().next() {
        Some(PointerSample::Released(touch.position()))
    } else if touch_input.any_just_canceled() {
        Some(PointerSample::Lost)
    } else {
        touch_input
            .iter()
            .next()
            .map(|touch| PointerSample::Held(touch.position()))
    }
}

/// Same as [`pointer_screen_sample`] but in world coordinates.
pub fn pointer_world_sample(
    button_input: &Res<ButtonInput<MouseButton>>,
    touch_input: &Res<Touches>,
    windows: &Query<&Window>,
    camera: &Query<(&Camera, &GlobalTransform)>,
) -> Option<PointerSample> {
    let sample = pointer_screen_sample(button_input, touch_input, windows)?;
    let Some(position) = sample.position() else {
        return Some(PointerSample::Lost);
    };
    Some(
        screen_to_world(camera, position)
            .map_or(PointerSample::Lost, |world| sample.with_position(world)),
    )
}

pub fn screen_to_world(camera: &Query<(&Camera, &GlobalTransform)>, position: Vec2) -> Option<Vec2> {
    let (camera, camera_transform) = camera.get_single().ok()?;

    camera
        .viewport_to_world(camera_transform, position)
        .map(|ray| ray.origin.truncate())
        .ok()
}
