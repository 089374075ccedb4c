use bevy::prelude::*;
use bits_helpers::floating_score::FloatingScorePlugin;

mod board;
mod game;
mod input;
mod screen;

use board::BoardPlugin;
use game::GamePlugin;
use input::InputPlugin;
use screen::ScreenPlugin;

pub fn run() {
    bits_helpers::get_default_app(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
        .add_plugins(FloatingScorePlugin)
        .add_plugins(GamePlugin)
        .add_plugins(BoardPlugin)
        .add_plugins(InputPlugin)
        .add_plugins(ScreenPlugin)
        .add_systems(Startup, setup)
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn(Camera2d);
}
