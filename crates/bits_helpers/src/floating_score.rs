use core::time::Duration;

use bevy::prelude::*;

/// A world-space label that drifts upwards and shrinks away.
#[derive(Component)]
pub struct FloatingScore {
    timer: Timer,
    initial_position: Vec2,
}

pub fn spawn_floating_score(commands: &mut Commands, position: Vec2, text: &str, color: Srgba) {
    commands.spawn((
        Text2d::new(text),
        TextFont {
            font_size: 24.0,
            ..default()
        },
        TextColor(Color::Srgba(color)),
        Transform::from_translation(position.extend(10.0)),
        FloatingScore {
            timer: Timer::new(Duration::from_secs(1), TimerMode::Once),
            initial_position: position,
        },
    ));
}

pub fn animate_floating_scores(
    mut commands: Commands,
    time: Res<Time>,
    mut query: Query<(Entity, &mut Transform, &mut FloatingScore)>,
) {
    for (entity, mut transform, mut floating_score) in &mut query {
        floating_score.timer.tick(time.delta());
        let progress = floating_score.timer.fraction();

        // Move upwards and fade out
        transform.translation.y = 50.0f32.mul_add(progress, floating_score.initial_position.y);
        transform.scale = Vec3::splat(1.0 - progress);

        if floating_score.timer.finished() {
            commands.entity(entity).despawn();
        }
    }
}

/// Registers the floating score animation.
pub struct FloatingScorePlugin;

impl Plugin for FloatingScorePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, animate_floating_scores);
    }
}
