//! Per-frame animation state: digital rain, bouncing info panel, ticker.
//!
//! Everything here is mutated by the render loop only.

use once_cell::sync::Lazy;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Chance that a background drop draws and advances on a given tick.
pub const BACKGROUND_DRAW_CHANCE: f64 = 0.6;
/// Chance that a foreground glyph uses an accent color instead of lime.
pub const ACCENT_CHANCE: f64 = 0.4;
/// Chance that a foreground drop jumps back to the top early.
pub const FOREGROUND_RESET_CHANCE: f64 = 0.02;

pub static GLYPHS: Lazy<Vec<char>> = Lazy::new(|| {
    concat!(
        "ｱｲｳｴｵｶｷｸｹｺｻｼｽｾｿﾀﾁﾂﾃﾄ",
        "ﾅﾆﾇﾈﾉﾊﾋﾌﾍﾎﾏﾐﾑﾒﾓﾔﾕﾖﾗﾘﾙﾚﾛﾜﾝ",
        "0123456789abcdefghijklmnopqrstuvwxyz",
        "ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$%^&*()-=+[]{}|;:<>,.?/~\\■□█▓░"
    )
    .chars()
    .collect()
});

/// Accent palette used by foreground drops and the info panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accent {
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
    White,
    Lime,
}

impl Accent {
    pub const ALL: [Accent; 9] = [
        Accent::Red,
        Accent::Orange,
        Accent::Yellow,
        Accent::Green,
        Accent::Cyan,
        Accent::Blue,
        Accent::Magenta,
        Accent::White,
        Accent::Lime,
    ];

    /// Palette entry for a monotonically increasing cycle index.
    pub fn cycled(index: usize) -> Accent {
        Self::ALL[index % Self::ALL.len()]
    }
}

/// Color class of a rain glyph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tint {
    /// Dim green of the background layer
    Shadow,
    /// Default foreground color (lime)
    Highlight,
    Accent(Accent),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    Background,
    Foreground,
}

/// One vertical animation lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropColumn {
    pub position: usize,
    pub kind: DropKind,
}

/// A glyph drawn on the current rain tick, in grid coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Glyph {
    pub column: usize,
    pub row: usize,
    pub ch: char,
    pub tint: Tint,
}

/// Rain grid size in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridDimensions {
    pub columns: usize,
    pub rows: usize,
}

impl GridDimensions {
    /// Surface size divided by cell size. Never yields zero rows or columns.
    pub fn from_surface(width: u16, height: u16, cell_width: u16, cell_height: u16) -> Self {
        Self {
            columns: (width / cell_width.max(1)).max(1) as usize,
            rows: (height / cell_height.max(1)).max(1) as usize,
        }
    }
}

/// Width and height of a rectangle in cells.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Foreground and background drops, one of each per grid column.
#[derive(Debug, Clone, Default)]
pub struct RainField {
    grid: GridDimensions,
    background: Vec<DropColumn>,
    foreground: Vec<DropColumn>,
}

impl RainField {
    pub fn grid(&self) -> GridDimensions {
        self.grid
    }

    pub fn background(&self) -> &[DropColumn] {
        &self.background
    }

    pub fn foreground(&self) -> &[DropColumn] {
        &self.foreground
    }

    /// Adopt new grid dimensions. Returns whether the drops were reseeded.
    pub fn resize<R: Rng>(&mut self, grid: GridDimensions, rng: &mut R) -> bool {
        if grid == self.grid {
            return false;
        }
        self.grid = grid;
        self.background = seed_columns(grid, DropKind::Background, rng);
        self.foreground = seed_columns(grid, DropKind::Foreground, rng);
        true
    }

    /// Advance every drop by one tick and return the glyphs drawn on it.
    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> Vec<Glyph> {
        let rows = self.grid.rows.max(1);
        let mut glyphs = Vec::with_capacity(self.background.len() + self.foreground.len());

        for (column, drop) in self.background.iter_mut().enumerate() {
            if !rng.random_bool(BACKGROUND_DRAW_CHANCE) {
                continue;
            }
            glyphs.push(Glyph {
                column,
                row: drop.position,
                ch: random_glyph(rng),
                tint: Tint::Shadow,
            });
            drop.position = (drop.position + 1) % rows;
        }

        for (column, drop) in self.foreground.iter_mut().enumerate() {
            let tint = if rng.random_bool(ACCENT_CHANCE) {
                Tint::Accent(*Accent::ALL.choose(rng).unwrap_or(&Accent::Lime))
            } else {
                Tint::Highlight
            };
            glyphs.push(Glyph {
                column,
                row: drop.position,
                ch: random_glyph(rng),
                tint,
            });

            let below_visible = drop.position >= rows;
            drop.position = if below_visible || rng.random_bool(FOREGROUND_RESET_CHANCE) {
                0
            } else {
                drop.position + 1
            };
        }

        glyphs
    }
}

fn seed_columns<R: Rng>(grid: GridDimensions, kind: DropKind, rng: &mut R) -> Vec<DropColumn> {
    (0..grid.columns)
        .map(|_| DropColumn {
            position: rng.random_range(0..grid.rows.max(1)),
            kind,
        })
        .collect()
}

fn random_glyph<R: Rng>(rng: &mut R) -> char {
    *GLYPHS.choose(rng).unwrap_or(&'0')
}

/// Position and velocity of the bouncing info panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationCursor {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Default for AnimationCursor {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 2.0,
            dx: 1.0,
            dy: 1.0,
        }
    }
}

/// Which deltas were inverted by a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Reflection {
    pub horizontal: bool,
    pub vertical: bool,
}

impl AnimationCursor {
    /// Move one step inside `container`, reflecting off its edges.
    pub fn step(&mut self, panel: Extent, container: Extent) -> Reflection {
        Reflection {
            horizontal: reflect_axis(&mut self.x, &mut self.dx, panel.width, container.width),
            vertical: reflect_axis(&mut self.y, &mut self.dy, panel.height, container.height),
        }
    }

    /// Pull the panel back inside `container` without moving it otherwise.
    pub fn clamp_into(&mut self, panel: Extent, container: Extent) {
        self.x = self.x.clamp(0.0, (container.width - panel.width).max(0.0));
        self.y = self.y.clamp(0.0, (container.height - panel.height).max(0.0));
    }
}

/// Clamp, reflect when an edge is touched while heading into it, then move.
///
/// Position stays in `[0, limit - extent]`; a panel that does not fit is
/// pinned at 0.
fn reflect_axis(pos: &mut f32, delta: &mut f32, extent: f32, limit: f32) -> bool {
    let max = (limit - extent).max(0.0);
    *pos = pos.clamp(0.0, max);
    if max <= 0.0 {
        return false;
    }

    let touching = (*pos <= 0.0 && *delta < 0.0) || (*pos >= max && *delta > 0.0);
    if touching {
        *delta = -*delta;
    }
    *pos = (*pos + *delta).clamp(0.0, max);
    touching
}

/// Horizontal scroll position of the news ticker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickerCursor {
    pub x: f32,
}

impl TickerCursor {
    pub fn new(x: f32) -> Self {
        Self { x }
    }

    /// Scroll left by `step`; once the text is fully past the left edge,
    /// restart just past the right edge of the container.
    pub fn step(&mut self, step: f32, text_width: f32, container_width: f32) -> bool {
        self.x -= step;
        if self.x + text_width < 0.0 {
            self.x = container_width;
            return true;
        }
        false
    }
}

/// All mutable animation state, owned by the render loop.
pub struct AnimationState {
    rng: StdRng,
    cell_width: u16,
    cell_height: u16,
    surface: Extent,
    rain: RainField,
    glyphs: Vec<Glyph>,
    pub panel: AnimationCursor,
    pub ticker: TickerCursor,
}

impl AnimationState {
    pub fn new(cell_width: u16, cell_height: u16) -> Self {
        Self::with_rng(StdRng::from_os_rng(), cell_width, cell_height)
    }

    /// Deterministic state for tests and replays.
    pub fn with_seed(seed: u64, cell_width: u16, cell_height: u16) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), cell_width, cell_height)
    }

    fn with_rng(rng: StdRng, cell_width: u16, cell_height: u16) -> Self {
        Self {
            rng,
            cell_width: cell_width.max(1),
            cell_height: cell_height.max(1),
            surface: Extent::default(),
            rain: RainField::default(),
            glyphs: Vec::new(),
            panel: AnimationCursor::default(),
            ticker: TickerCursor::new(0.0),
        }
    }

    pub fn surface(&self) -> Extent {
        self.surface
    }

    pub fn rain(&self) -> &RainField {
        &self.rain
    }

    pub fn grid(&self) -> GridDimensions {
        self.rain.grid()
    }

    pub fn cell_size(&self) -> (u16, u16) {
        (self.cell_width, self.cell_height)
    }

    /// Glyphs drawn by the most recent rain tick.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    /// React to a new surface size: recompute the grid, reseed drops if the
    /// grid changed, and keep the panel inside. Returns whether drops were
    /// reseeded.
    pub fn resize(&mut self, width: u16, height: u16, panel: Extent) -> bool {
        let first = self.surface == Extent::default();
        self.surface = Extent::new(width as f32, height as f32);
        if first {
            self.ticker.x = self.surface.width;
        }

        let grid = GridDimensions::from_surface(width, height, self.cell_width, self.cell_height);
        let reseeded = self.rain.resize(grid, &mut self.rng);
        if reseeded {
            self.glyphs.clear();
        }
        self.panel.clamp_into(panel, self.surface);
        reseeded
    }

    pub fn tick_rain(&mut self) {
        self.glyphs = self.rain.tick(&mut self.rng);
    }

    pub fn tick_panel(&mut self, panel: Extent) -> Reflection {
        self.panel.step(panel, self.surface)
    }

    pub fn tick_ticker(&mut self, step: f32, text_width: f32) -> bool {
        self.ticker.step(step, text_width, self.surface.width)
    }
}
