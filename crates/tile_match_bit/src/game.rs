use bevy::color::palettes::css::YELLOW;
use bevy::prelude::*;
use bits_helpers::floating_score::spawn_floating_score;
use bits_helpers::restart::{Restartable, handle_restart};
use tile_match::prelude::*;

use crate::board::BoardLayout;

pub struct GamePlugin;

#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash, Default, States)]
pub enum GameState {
    #[default]
    Welcome,
    Playing,
    GameOver,
}

/// Per-frame phases of a running game, run in this order.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnSet {
    Input,
    Simulate,
    Present,
}

/// Rules and look of the board.
#[derive(Resource, Deref, Default)]
pub struct GameConfig(pub Match3Config);

/// The player's session. Lives from startup until the app closes.
#[derive(Resource, Deref, DerefMut)]
pub struct ActiveSession(pub Session);

impl Restartable for ActiveSession {
    fn reset(&mut self) {
        self.0.start_round();
    }

    fn initial_state() -> Self::State {
        GameState::Playing
    }

    type State = GameState;
}

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        app.init_state::<GameState>()
            .init_resource::<GameConfig>()
            .configure_sets(
                Update,
                (TurnSet::Input, TurnSet::Simulate, TurnSet::Present)
                    .chain()
                    .run_if(resource_exists::<ActiveSession>),
            )
            .add_systems(Startup, init_session)
            .add_systems(
                Update,
                handle_restart::<ActiveSession>
                    .in_set(TurnSet::Input)
                    .run_if(not(in_state(GameState::Playing))),
            )
            .add_systems(
                Update,
                (advance_session, dispatch_session_events)
                    .chain()
                    .in_set(TurnSet::Simulate)
                    .run_if(in_state(GameState::Playing)),
            );
    }
}

fn init_session(mut commands: Commands, config: Res<GameConfig>) {
    match Session::new(config.0.clone()) {
        Ok(session) => {
            commands.insert_resource(BoardLayout::new(&config));
            commands.insert_resource(ActiveSession(session));
        }
        Err(err) => error!("invalid game configuration: {err}"),
    }
}

fn advance_session(time: Res<Time>, mut session: ResMut<ActiveSession>) {
    session.advance(time.delta());
}

fn dispatch_session_events(
    mut commands: Commands,
    mut session: ResMut<ActiveSession>,
    layout: Res<BoardLayout>,
    mut next_state: ResMut<NextState<GameState>>,
) {
    while let Some(event) = session.events().pop() {
        match event {
            SessionEvent::RoundStarted { round } => info!("round {round} started"),
            SessionEvent::Cleared { cleared, score } => {
                for (run, region) in cleared.runs.iter().zip(&cleared.regions) {
                    let (x, y) = region.center();
                    spawn_floating_score(
                        &mut commands,
                        layout.to_world(Point::new(x, y)),
                        &format!("+{}", run.len()),
                        YELLOW,
                    );
                }
                debug!(pass = cleared.pass, points = cleared.points, score, "cleared");
            }
            SessionEvent::MoveRejected(reason) => debug!(?reason, "move rejected"),
            SessionEvent::GameOver { entry, kept } => {
                info!(%entry, kept, "game over");
                next_state.set(GameState::GameOver);
            }
            _ => {}
        }
    }
}
