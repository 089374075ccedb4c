use crate::tile::Tile;

/// An axis-aligned rectangle in board pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// What the game core needs from whatever puts pixels on screen.
///
/// The core only calls a renderer after its state has changed, never in the
/// middle of resolving a move.
pub trait Renderer {
    /// Paints one square tile. Later calls are drawn on top of earlier ones.
    fn draw_tile(&mut self, tile: &Tile, show_id: bool);

    /// Blanks a region until the next full draw.
    fn clear_region(&mut self, region: Region);

    fn update_readouts(&mut self, score: u32, remaining_turns: u32);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Tile { tile: Tile, show_id: bool },
    Clear(Region),
    Readouts { score: u32, remaining_turns: u32 },
}

/// A renderer that records what it was asked to draw, for retained-mode
/// front ends that apply a frame in one go.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameRecorder {
    commands: Vec<DrawCommand>,
}

impl FrameRecorder {
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn drain(&mut self) -> impl Iterator<Item = DrawCommand> + '_ {
        self.commands.drain(..)
    }

    /// Tiles in paint order.
    pub fn tiles(&self) -> impl Iterator<Item = (&Tile, bool)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Tile { tile, show_id } => Some((tile, *show_id)),
            _ => None,
        })
    }
}

impl Renderer for FrameRecorder {
    fn draw_tile(&mut self, tile: &Tile, show_id: bool) {
        self.commands.push(DrawCommand::Tile {
            tile: tile.clone(),
            show_id,
        });
    }

    fn clear_region(&mut self, region: Region) {
        self.commands.push(DrawCommand::Clear(region));
    }

    fn update_readouts(&mut self, score: u32, remaining_turns: u32) {
        self.commands.push(DrawCommand::Readouts {
            score,
            remaining_turns,
        });
    }
}
