use bevy::color::palettes::css::{RED, YELLOW};
use bevy::prelude::*;
use bits_helpers::restart::spawn_restart_button;

use crate::board::Readouts;
use crate::game::{ActiveSession, GameState, TurnSet};

/// Plugin for the welcome and game over screens plus the in-game HUD.
pub struct ScreenPlugin;

#[derive(Component)]
struct WelcomeScreen;

#[derive(Component)]
struct GameOverScreen;

/// One line of the HUD.
#[derive(Component, Clone, Copy, PartialEq, Eq)]
enum HudField {
    Score,
    Turns,
    Round,
    HighScores,
}

impl Plugin for ScreenPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GameState::Welcome), spawn_welcome_screen)
            .add_systems(OnExit(GameState::Welcome), (despawn_screen::<WelcomeScreen>, spawn_hud))
            .add_systems(OnEnter(GameState::GameOver), spawn_game_over)
            .add_systems(OnExit(GameState::GameOver), despawn_screen::<GameOverScreen>)
            .add_systems(
                Update,
                update_hud
                    .in_set(TurnSet::Present)
                    .run_if(not(in_state(GameState::Welcome))),
            );
    }
}

fn text(value: impl Into<String>, font_size: f32) -> (Text, TextFont, TextLayout) {
    (
        Text::new(value),
        TextFont {
            font_size,
            ..default()
        },
        TextLayout::new_with_justify(JustifyText::Center),
    )
}

fn spawn_welcome_screen(mut commands: Commands) {
    commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                ..default()
            },
            WelcomeScreen,
        ))
        .with_children(|parent| {
            parent.spawn(text("Tile Match", 64.0));
            parent.spawn(text(
                "Drag a tile onto a neighbour to swap them.\nLine up 3 or more of a colour.",
                24.0,
            ));
            spawn_restart_button(parent, "Start");
        });
}

fn spawn_hud(mut commands: Commands) {
    // top bar
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::SpaceEvenly,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((text("Score: 0", 28.0), HudField::Score));
            parent.spawn((text("Turns: 0", 28.0), HudField::Turns));
            parent.spawn((text("Round #0", 28.0), HudField::Round));
        });

    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(12.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((text("", 18.0), TextColor(Color::Srgba(YELLOW)), HudField::HighScores));
        });
}

fn update_hud(
    readouts: Res<Readouts>,
    session: Res<ActiveSession>,
    mut fields: Query<(&HudField, &mut Text, &mut TextColor)>,
) {
    if !readouts.is_changed() && !session.is_changed() {
        return;
    }

    for (field, mut text, mut color) in &mut fields {
        let value = match field {
            HudField::Score => format!("Score: {}", readouts.score),
            HudField::Turns => {
                color.0 = if readouts.remaining_turns == 0 {
                    Color::Srgba(RED)
                } else {
                    Color::WHITE
                };
                format!("Turns: {}", readouts.remaining_turns)
            }
            HudField::Round => format!("Round #{}", session.round()),
            HudField::HighScores => {
                let entries: Vec<String> = session
                    .high_scores()
                    .entries()
                    .iter()
                    .map(ToString::to_string)
                    .collect();
                if entries.is_empty() {
                    String::new()
                } else {
                    format!("High scores\n{}", entries.join("\n"))
                }
            }
        };
        text.0 = value;
    }
}

fn spawn_game_over(mut commands: Commands, session: Res<ActiveSession>) {
    commands
        .spawn((
            Node {
                position_type: PositionType::Absolute,
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgba(0.1, 0.1, 0.1, 0.6)),
            GameOverScreen,
        ))
        .with_children(|parent| {
            parent.spawn(text("Game Over!", 64.0));
            parent.spawn((
                text(format!("Final Score: {}", session.score()), 40.0),
                TextColor(Color::Srgba(YELLOW)),
            ));
            spawn_restart_button(parent, "Play again");
        });
}

fn despawn_screen<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn_recursive();
    }
}
