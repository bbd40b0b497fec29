//! Terminal backend for the renderer. All terminal I/O lives here.
//!
//! [`TerminalSurface`] rasterises draw calls into a grid of character cells
//! (one cell covers `cell_width × cell_height` playfield units) and flushes
//! the grid with crossterm in a single batch.  [`GlyphAssets`] stands in for
//! the sprite loader: a "sprite" is a glyph stamped over the destination.

use std::collections::HashSet;
use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Attribute, Color as TermColor, Print},
    QueueableCommand,
};
use log::{info, warn};

use pixel_expedition::config::AssetConfig;
use pixel_expedition::entities::Rect;
use pixel_expedition::render::{Align, AssetProvider, Color, SpriteKey, Surface, TextStyle};

// ── Cells ─────────────────────────────────────────────────────────────────────

type Rgb = (u8, u8, u8);

#[derive(Clone, Copy, Debug, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
    bold: bool,
}

const BLANK: Cell = Cell { ch: ' ', fg: (255, 255, 255), bg: (0, 0, 0), bold: false };

fn blend(under: Rgb, over: Color, alpha: f32) -> Rgb {
    let a = alpha.clamp(0.0, 1.0);
    let mix = |u: u8, o: u8| (u as f32 + (o as f32 - u as f32) * a).round() as u8;
    (mix(under.0, over.r), mix(under.1, over.g), mix(under.2, over.b))
}

// ── Transform state ───────────────────────────────────────────────────────────

/// 2×3 affine matrix `[a c e; b d f]` plus the global opacity.
#[derive(Clone, Copy, Debug)]
struct DrawState {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0, alpha: 1.0 }
    }
}

impl DrawState {
    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }

    /// Axis-aligned box of `rect` after transformation.  Rotation only moves
    /// the centre; cells cannot be rotated.
    fn map_rect(&self, rect: Rect) -> Rect {
        let (cx, cy) = rect.center();
        let (wx, wy) = self.apply(cx, cy);
        let s = self.scale_factor();
        let (w, h) = (rect.width * s, rect.height * s);
        Rect::new(wx - w / 2.0, wy - h / 2.0, w, h)
    }
}

// ── Surface ───────────────────────────────────────────────────────────────────

pub struct TerminalSurface {
    cols: u16,
    rows: u16,
    cell_width: f32,
    cell_height: f32,
    cells: Vec<Cell>,
    current: DrawState,
    stack: Vec<DrawState>,
}

impl TerminalSurface {
    pub fn new(cols: u16, rows: u16, cell_width: f32, cell_height: f32) -> Self {
        Self {
            cols,
            rows,
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
            cells: vec![BLANK; cols as usize * rows as usize],
            current: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Reallocate the grid when the terminal size changes, then blank it.
    pub fn begin_frame(&mut self, cols: u16, rows: u16) {
        if (cols, rows) != (self.cols, self.rows) {
            self.cols = cols;
            self.rows = rows;
            self.cells = vec![BLANK; cols as usize * rows as usize];
        } else {
            self.cells.fill(BLANK);
        }
        self.current = DrawState::default();
        self.stack.clear();
    }

    /// Emit the whole grid, only switching colours when they change.
    pub fn flush<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let mut last: Option<(Rgb, Rgb, bool)> = None;

        for row in 0..self.rows {
            out.queue(cursor::MoveTo(0, row))?;
            for col in 0..self.cols {
                let cell = self.cells[self.index(col, row)];
                let look = (cell.fg, cell.bg, cell.bold);
                if last != Some(look) {
                    out.queue(style::SetAttribute(if cell.bold {
                        Attribute::Bold
                    } else {
                        Attribute::NormalIntensity
                    }))?;
                    out.queue(style::SetForegroundColor(rgb(cell.fg)))?;
                    out.queue(style::SetBackgroundColor(rgb(cell.bg)))?;
                    last = Some(look);
                }
                out.queue(Print(cell.ch))?;
            }
        }

        out.queue(style::SetAttribute(Attribute::Reset))?;
        out.queue(style::ResetColor)?;
        out.flush()
    }

    fn index(&self, col: u16, row: u16) -> usize {
        row as usize * self.cols as usize + col as usize
    }

    fn cell_mut(&mut self, col: i32, row: i32) -> Option<&mut Cell> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        let i = self.index(col as u16, row as u16);
        self.cells.get_mut(i)
    }

    /// Cell containing the playfield point.
    fn cell_at(&self, x: f32, y: f32) -> (i32, i32) {
        ((x / self.cell_width).floor() as i32, (y / self.cell_height).floor() as i32)
    }

    /// Inclusive cell span covered by a playfield rectangle.
    fn span(&self, r: Rect) -> (i32, i32, i32, i32) {
        let c0 = (r.x / self.cell_width).floor() as i32;
        let r0 = (r.y / self.cell_height).floor() as i32;
        let c1 = ((r.right() / self.cell_width).ceil() as i32 - 1).max(c0);
        let r1 = ((r.bottom() / self.cell_height).ceil() as i32 - 1).max(r0);
        (c0, r0, c1, r1)
    }

    fn is_sub_cell(&self, r: Rect) -> bool {
        r.width < self.cell_width && r.height < self.cell_height
    }

    fn put_glyph(&mut self, col: i32, row: i32, ch: char, color: Color, alpha: f32) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.fg = blend(cell.bg, color, alpha);
            cell.ch = ch;
        }
    }

    fn tint(&mut self, col: i32, row: i32, color: Color, alpha: f32) {
        if let Some(cell) = self.cell_mut(col, row) {
            cell.bg = blend(cell.bg, color, alpha);
            if alpha >= 0.5 {
                cell.ch = ' ';
            }
        }
    }

    fn stamp(&mut self, dest: Rect, ch: char, color: Color) {
        let r = self.current.map_rect(dest);
        let alpha = self.current.alpha;
        let (c0, r0, c1, r1) = self.span(r);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.put_glyph(col, row, ch, color, alpha);
            }
        }
    }
}

fn rgb((r, g, b): Rgb) -> TermColor {
    TermColor::Rgb { r, g, b }
}

impl Surface for TerminalSurface {
    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let r = self.current.map_rect(rect);
        let alpha = color.a * self.current.alpha;
        if self.is_sub_cell(r) {
            let (cx, cy) = r.center();
            let (col, row) = self.cell_at(cx, cy);
            self.put_glyph(col, row, '▪', color, alpha);
            return;
        }
        let (c0, r0, c1, r1) = self.span(r);
        for row in r0..=r1 {
            for col in c0..=c1 {
                self.tint(col, row, color, alpha);
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color, _line_width: f32) {
        let r = self.current.map_rect(rect);
        let alpha = color.a * self.current.alpha;
        let (c0, r0, c1, r1) = self.span(r);
        if c0 == c1 || r0 == r1 {
            let (col, row) = self.cell_at(r.center().0, r.center().1);
            self.put_glyph(col, row, '□', color, alpha);
            return;
        }
        for col in c0..=c1 {
            self.put_glyph(col, r0, '─', color, alpha);
            self.put_glyph(col, r1, '─', color, alpha);
        }
        for row in r0..=r1 {
            self.put_glyph(c0, row, '│', color, alpha);
            self.put_glyph(c1, row, '│', color, alpha);
        }
        self.put_glyph(c0, r0, '┌', color, alpha);
        self.put_glyph(c1, r0, '┐', color, alpha);
        self.put_glyph(c0, r1, '└', color, alpha);
        self.put_glyph(c1, r1, '┘', color, alpha);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color) {
        let (wx, wy) = self.current.apply(cx, cy);
        let radius = radius * self.current.scale_factor();
        let alpha = color.a * self.current.alpha;
        if radius * 2.0 < self.cell_width {
            let (col, row) = self.cell_at(wx, wy);
            self.put_glyph(col, row, '●', color, alpha);
            return;
        }
        let (c0, r0, c1, r1) =
            self.span(Rect::new(wx - radius, wy - radius, radius * 2.0, radius * 2.0));
        for row in r0..=r1 {
            for col in c0..=c1 {
                let px = (col as f32 + 0.5) * self.cell_width - wx;
                let py = (row as f32 + 0.5) * self.cell_height - wy;
                if px * px + py * py <= radius * radius {
                    self.tint(col, row, color, alpha);
                }
            }
        }
    }

    fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Color, _line_width: f32) {
        let (wx, wy) = self.current.apply(cx, cy);
        let radius = radius * self.current.scale_factor();
        let alpha = color.a * self.current.alpha;
        let band = self.cell_width.max(self.cell_height) / 2.0;
        let (c0, r0, c1, r1) = self.span(Rect::new(
            wx - radius - band,
            wy - radius - band,
            (radius + band) * 2.0,
            (radius + band) * 2.0,
        ));
        for row in r0..=r1 {
            for col in c0..=c1 {
                let px = (col as f32 + 0.5) * self.cell_width - wx;
                let py = (row as f32 + 0.5) * self.cell_height - wy;
                if ((px * px + py * py).sqrt() - radius).abs() <= band {
                    self.put_glyph(col, row, '·', color, alpha);
                }
            }
        }
    }

    fn text(&mut self, text: &str, x: f32, y: f32, style: TextStyle) {
        let (wx, wy) = self.current.apply(x, y);
        let alpha = style.color.a * self.current.alpha;
        let len = text.chars().count() as i32;
        // Baseline sits at the bottom of the cell row.
        let (col, row) = self.cell_at(wx, wy - 1.0);
        let start = match style.align {
            Align::Left => col,
            Align::Center => col - len / 2,
            Align::Right => col - len,
        };
        for (i, ch) in text.chars().enumerate() {
            let c = start + i as i32;
            self.put_glyph(c, row, ch, style.color, alpha);
            if let Some(cell) = self.cell_mut(c, row) {
                cell.bold = style.bold;
            }
        }
    }

    fn draw_image(&mut self, key: SpriteKey, dest: Rect) {
        let (ch, color) = glyph_art(key);
        if key == SpriteKey::SpaceBackground {
            let r = self.current.map_rect(dest);
            let (c0, r0, c1, r1) = self.span(r);
            let shift = (r.y / self.cell_height).floor() as i32;
            for row in r0..=r1 {
                for col in c0..=c1 {
                    if (col * 7 + (row - shift) * 13).rem_euclid(29) == 0 {
                        self.put_glyph(col, row, ch, color, self.current.alpha);
                    }
                }
            }
            return;
        }
        self.stamp(dest, ch, color);
    }

    fn save(&mut self) {
        self.stack.push(self.current);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.current = state;
        }
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let s = &mut self.current;
        s.e += s.a * dx + s.c * dy;
        s.f += s.b * dx + s.d * dy;
    }

    fn rotate(&mut self, radians: f32) {
        let (sin, cos) = radians.sin_cos();
        let s = &mut self.current;
        let (a, b, c, d) = (s.a, s.b, s.c, s.d);
        s.a = a * cos + c * sin;
        s.b = b * cos + d * sin;
        s.c = c * cos - a * sin;
        s.d = d * cos - b * sin;
    }

    fn scale(&mut self, factor: f32) {
        let s = &mut self.current;
        s.a *= factor;
        s.b *= factor;
        s.c *= factor;
        s.d *= factor;
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.current.alpha = alpha.clamp(0.0, 1.0);
    }
}

/// The terminal's "sprite sheet".
fn glyph_art(key: SpriteKey) -> (char, Color) {
    match key {
        SpriteKey::PlayerShip => ('▲', Color::hex(0x55ccff)),
        SpriteKey::SkullEnemy => ('◎', Color::hex(0xff5555)),
        SpriteKey::Meteor => ('◆', Color::hex(0x998877)),
        SpriteKey::PlayerBullet => ('║', Color::hex(0xffff66)),
        SpriteKey::EnemyBullet => ('↓', Color::hex(0xff55ff)),
        SpriteKey::Shield => ('░', Color::hex(0x00ffff)),
        SpriteKey::ExplosionFrame1 => ('*', Color::hex(0xffffaa)),
        SpriteKey::ExplosionFrame2 => ('✶', Color::hex(0xffcc33)),
        SpriteKey::ExplosionFrame3 => ('✷', Color::hex(0xff8800)),
        SpriteKey::ExplosionFrame4 => ('·', Color::hex(0x884400)),
        SpriteKey::SpaceBackground => ('.', Color::hex(0x8888aa)),
    }
}

// ── Assets ────────────────────────────────────────────────────────────────────

/// Which glyph sprites are available.  `missing` keys are never ready;
/// `broken` keys report an error.  With sprites disabled nothing is ready.
pub struct GlyphAssets {
    enabled: bool,
    missing: HashSet<SpriteKey>,
    broken: HashSet<SpriteKey>,
}

impl GlyphAssets {
    pub fn new(config: &AssetConfig, enabled: bool) -> Self {
        let broken: HashSet<SpriteKey> = config.broken.iter().copied().collect();
        for key in &broken {
            warn!("sprite {} failed to load, drawing it procedurally", key.path());
        }
        let assets = Self { enabled, missing: config.missing.iter().copied().collect(), broken };
        let usable = SpriteKey::ALL.iter().filter(|&&key| assets.usable(key)).count();
        info!("{usable}/{} glyph sprites usable", SpriteKey::ALL.len());
        assets
    }
}

impl AssetProvider for GlyphAssets {
    fn ready(&self, key: SpriteKey) -> bool {
        self.enabled && !self.missing.contains(&key)
    }

    fn errored(&self, key: SpriteKey) -> bool {
        self.broken.contains(&key)
    }
}
