use bevy::prelude::*;
use bits_helpers::input::{PointerSample, pointer_world_sample};
use tile_match::prelude::*;

use crate::board::BoardLayout;
use crate::game::{ActiveSession, GameState, TurnSet};

pub struct InputPlugin;

impl Plugin for InputPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            Update,
            forward_pointer
                .in_set(TurnSet::Input)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

/// Turns raw pointer samples into board-local session input.
///
/// Moves are only forwarded when the pointer actually moved, and leaving the
/// board while holding a tile counts as leaving the play area.
fn forward_pointer(
    buttons: Res<ButtonInput<MouseButton>>,
    touches: Res<Touches>,
    windows: Query<&Window>,
    camera: Query<(&Camera, &GlobalTransform)>,
    layout: Res<BoardLayout>,
    mut session: ResMut<ActiveSession>,
    mut last_position: Local<Option<Point>>,
) {
    let Some(sample) = pointer_world_sample(&buttons, &touches, &windows, &camera) else {
        *last_position = None;
        return;
    };

    let event = match sample {
        PointerSample::Pressed(world) => {
            let local = layout.to_local(world);
            *last_position = Some(local);
            if !layout.contains(local) {
                return;
            }
            PointerEvent::Down(local)
        }
        PointerSample::Held(world) => {
            let local = layout.to_local(world);
            if *last_position == Some(local) {
                return;
            }
            *last_position = Some(local);
            if layout.contains(local) {
                PointerEvent::Move(local)
            } else {
                PointerEvent::Leave
            }
        }
        PointerSample::Released(world) => {
            let local = layout.to_local(world);
            *last_position = None;
            if layout.contains(local) {
                PointerEvent::Up(local)
            } else {
                PointerEvent::Leave
            }
        }
        PointerSample::Lost => {
            *last_position = None;
            PointerEvent::Leave
        }
    };

    session.pointer(event);
}
