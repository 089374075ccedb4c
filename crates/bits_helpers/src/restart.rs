use bevy::prelude::*;
use bevy::state::state::FreelyMutableState;

#[derive(Component)]
pub struct RestartButton;

pub trait Restartable: Resource {
    fn reset(&mut self);
    fn initial_state() -> Self::State;
    type State: States + FreelyMutableState;
}

pub fn handle_restart<T: Restartable>(
    mut next_state: ResMut<NextState<T::State>>,
    mut restartable: ResMut<T>,
    mut interaction_query: Query<&Interaction, (Changed<Interaction>, With<RestartButton>)>,
) {
    for interaction in &mut interaction_query {
        if *interaction == Interaction::Pressed {
            restartable.reset();
            next_state.set(T::initial_state());
        }
    }
}

/// Adds a UI button carrying [`RestartButton`] under `parent`.
pub fn spawn_restart_button(parent: &mut ChildBuilder, label: &str) {
    parent
        .spawn((
            Node {
                width: Val::Px(200.0),
                height: Val::Px(65.0),
                margin: UiRect::all(Val::Px(20.0)),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(Color::srgb(0.15, 0.15, 0.15)),
            BorderRadius::all(Val::Px(8.0)),
            Button,
            RestartButton,
        ))
        .with_children(|button| {
            button.spawn((
                Text::new(label),
                TextFont {
                    font_size: 32.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
        });
}
