use bevy::prelude::*;
use bevy::utils::HashMap;
use tile_match::prelude::*;

use crate::game::{ActiveSession, GameConfig, GameState, TurnSet};

pub struct BoardPlugin;

const BOARD_OFFSET_Y: f32 = 20.0;
const BACKGROUND_Z: f32 = 0.0;
const TILE_Z: f32 = 1.0;
/// Keeps later draw calls above earlier ones
const Z_STEP: f32 = 0.001;
const OVERLAY_Z: f32 = 5.0;
const DIMMED_ALPHA: f32 = 0.6;
const GRID_GAP: f32 = 2.0;
const BOARD_BACKGROUND: Color = Color::srgb(0.12, 0.12, 0.12);

#[derive(Component)]
struct TileSprite(TileId);

#[derive(Component)]
struct TileLabel;

#[derive(Component)]
struct ClearOverlay;

/// Latest score and turn readouts handed to the renderer.
#[derive(Resource, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readouts {
    pub score: u32,
    pub remaining_turns: u32,
}

/// Maps board pixels (origin top-left, y down) to world space and back.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    top_left: Vec2,
    size: Vec2,
    tile_size: f32,
}

impl BoardLayout {
    pub fn new(config: &Match3Config) -> Self {
        let size = Vec2::new(config.board_width(), config.board_height());
        Self {
            top_left: Vec2::new(-size.x / 2.0, size.y / 2.0 - BOARD_OFFSET_Y),
            size,
            tile_size: config.tile_size,
        }
    }

    pub fn to_world(&self, local: Point) -> Vec2 {
        Vec2::new(self.top_left.x + local.x, self.top_left.y - local.y)
    }

    pub fn to_local(&self, world: Vec2) -> Point {
        Point::new(world.x - self.top_left.x, self.top_left.y - world.y)
    }

    pub fn contains(&self, local: Point) -> bool {
        (0.0..=self.size.x).contains(&local.x) && (0.0..=self.size.y).contains(&local.y)
    }

    fn center(&self) -> Vec2 {
        self.to_world(Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// World position of the center of a tile drawn at `position`.
    fn tile_center(&self, position: Point) -> Vec2 {
        let half = self.tile_size / 2.0;
        self.to_world(position + Point::new(half, half))
    }
}

impl Plugin for BoardPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Readouts>()
            .add_systems(
                OnExit(GameState::Welcome),
                spawn_board.run_if(resource_exists::<ActiveSession>),
            )
            .add_systems(
                Update,
                sync_board
                    .in_set(TurnSet::Present)
                    .run_if(not(in_state(GameState::Welcome))),
            );
    }
}

fn tile_color(kind: TileKind, alpha: f32) -> Color {
    let [red, green, blue] = kind.rgb();
    Color::srgb_u8(red, green, blue).with_alpha(alpha)
}

fn spawn_board(
    mut commands: Commands,
    session: Res<ActiveSession>,
    config: Res<GameConfig>,
    layout: Res<BoardLayout>,
) {
    commands.spawn((
        Sprite::from_color(BOARD_BACKGROUND, layout.size),
        Transform::from_translation(layout.center().extend(BACKGROUND_Z)),
    ));

    let gap = if config.show_grid { GRID_GAP } else { 0.0 };
    let side = Vec2::splat(config.tile_size - gap);
    for tile in session.grid().tiles() {
        commands
            .spawn((
                Sprite::from_color(tile_color(tile.kind, 1.0), side),
                Transform::from_translation(layout.tile_center(tile.position).extend(TILE_Z)),
                TileSprite(tile.id),
            ))
            .with_children(|parent| {
                parent.spawn((
                    Text2d::new(tile.id.get().to_string()),
                    TextFont {
                        font_size: 14.0,
                        ..default()
                    },
                    TextColor(Color::BLACK),
                    Transform::from_xyz(0.0, 0.0, Z_STEP / 2.0),
                    Visibility::Hidden,
                    TileLabel,
                ));
            });
    }
}

/// Replays the session's draw calls onto the sprites.
fn sync_board(
    mut commands: Commands,
    session: Res<ActiveSession>,
    layout: Res<BoardLayout>,
    mut readouts: ResMut<Readouts>,
    mut shown_regions: Local<Vec<Region>>,
    mut tiles: Query<(&TileSprite, &mut Sprite, &mut Transform, &Children)>,
    mut labels: Query<&mut Visibility, With<TileLabel>>,
    overlays: Query<Entity, With<ClearOverlay>>,
) {
    let mut frame = FrameRecorder::default();
    session.draw(&mut frame);

    let mut painted = HashMap::new();
    let mut regions = Vec::new();
    for (order, command) in frame.drain().enumerate() {
        match command {
            DrawCommand::Tile { tile, show_id } => {
                painted.insert(tile.id, (tile, show_id, order));
            }
            DrawCommand::Clear(region) => regions.push(region),
            DrawCommand::Readouts {
                score,
                remaining_turns,
            } => {
                readouts.set_if_neq(Readouts {
                    score,
                    remaining_turns,
                });
            }
        }
    }

    let alpha = if session.is_dimmed() { DIMMED_ALPHA } else { 1.0 };
    for (tile_sprite, mut sprite, mut transform, children) in &mut tiles {
        let Some((tile, show_id, order)) = painted.get(&tile_sprite.0) else {
            warn!("no draw call for tile {}", tile_sprite.0);
            continue;
        };
        sprite.color = tile_color(tile.kind, alpha);
        transform.translation = layout
            .tile_center(tile.position)
            .extend((*order as f32).mul_add(Z_STEP, TILE_Z));

        for child in children.iter() {
            if let Ok(mut visibility) = labels.get_mut(*child) {
                visibility.set_if_neq(if *show_id {
                    Visibility::Inherited
                } else {
                    Visibility::Hidden
                });
            }
        }
    }

    if *shown_regions == regions {
        return;
    }
    for entity in &overlays {
        commands.entity(entity).despawn();
    }
    for region in &regions {
        let (x, y) = region.center();
        commands.spawn((
            Sprite::from_color(BOARD_BACKGROUND, Vec2::new(region.width, region.height)),
            Transform::from_translation(layout.to_world(Point::new(x, y)).extend(OVERLAY_Z)),
            ClearOverlay,
        ));
    }
    *shown_regions = regions;
}
