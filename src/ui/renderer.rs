/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Compose the next frame into the `front` buffer
///   2. Compare each cell with the `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed, batched with `queue!`
///   4. Swap front/back
///
/// The room view is a 12×5 grid of tile slots: the current room's 10×3
/// tiles in the middle, ringed by the facing edge of each linked neighbour
/// (dimmed). Corners are always blank.

use std::io::{self, BufWriter, Write};

use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entity::{Facing, Guard, GuardKind, Motion, Stride, SwordState};
use crate::domain::room::{Loc, RoomGraph, RoomId, Side, COLS};
use crate::domain::tile::{DoorSide, GateState, Jaws, Potion, Spikes, Tile};
use crate::sim::world::{FlashColor, GameState, Phase};

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    /// Explicit dark background used for every cell and for `Clear`, so the
    /// gaps between rows match the cells on VTE terminals.
    const BASE_BG: Color = Color::Rgb { r: 22, g: 22, b: 35 };

    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: Cell::BASE_BG };

    /// Differs from any real cell; filling `back` with it forces a repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            *self = FrameBuffer::new(w, h);
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }
}

// ── Layout ──

const TILE_W: usize = 4;
const TILE_H: usize = 2;
const VIEW_COLS: usize = COLS as usize + 2;
const VIEW_ROWS: usize = 5;

const HUD_ROW: usize = 0;
const VIEW_ROW: usize = 2;
const MSG_ROW: usize = VIEW_ROW + VIEW_ROWS * TILE_H + 1;
const STATS_ROW: usize = MSG_ROW + 1;
const HELP_ROW: usize = STATS_ROW + 2;
const LEFT_PAD: usize = 2;

/// The board location shown in view slot (`vx`, `vy`), if any.
/// `vx` is 0..12 and `vy` 0..5; the current room fills 1..=10 × 1..=3.
fn slot_loc(graph: &RoomGraph, room: RoomId, vx: usize, vy: usize) -> Option<Loc> {
    let inner_x = (1..=COLS as usize).contains(&vx);
    let inner_y = (1..=3).contains(&vy);
    let (room, col, row) = match (vx, vy) {
        _ if inner_x && inner_y => (room, vx, vy - 1),
        (0, _) if inner_y => (graph.link(room, Side::Left)?, COLS as usize, vy - 1),
        (11, _) if inner_y => (graph.link(room, Side::Right)?, 1, vy - 1),
        (_, 0) if inner_x => (graph.link(room, Side::Up)?, vx, 2),
        (_, 4) if inner_x => (graph.link(room, Side::Down)?, vx, 0),
        _ => return None,
    };
    Loc::new(room.get(), (row * COLS as usize + col) as u8)
}

/// Two rows of `TILE_W` characters per tile; `mark` overwrites the second
/// character of the top row (button letters, pad letters).
struct Glyph {
    top: &'static str,
    bottom: &'static str,
    fg: Color,
    mark: Option<char>,
}

const FLOOR: &str = "▄▄▄▄";
const SOLID: &str = "████";
const OPEN: &str = "    ";

fn glyph(tile: Tile) -> Glyph {
    let g = |top, bottom, fg| Glyph { top, bottom, fg, mark: None };
    match tile {
        Tile::Empty | Tile::FakeEmpty | Tile::Unknown => g(OPEN, OPEN, Color::DarkGrey),
        Tile::Window => g(" ░░ ", OPEN, Color::DarkBlue),
        Tile::Floor => g(OPEN, FLOOR, Color::Grey),
        Tile::Coin => g(" $  ", FLOOR, Color::Yellow),
        Tile::Wall | Tile::FakeWall => g(SOLID, SOLID, Color::Grey),
        Tile::Spikes(Spikes::Retracted) => g(" .. ", FLOOR, Color::Grey),
        Tile::Spikes(Spikes::Extended) => g("/\\/\\", FLOOR, Color::Red),
        Tile::Pillar | Tile::PillarBottom => g(" ▐▌ ", "▄▐▌▄", Color::Grey),
        Tile::PillarTop => g(" ▐▌ ", " ▐▌ ", Color::Grey),
        Tile::Gate(GateState::Closed) => g(" ## ", "▄##▄", Color::Cyan),
        Tile::Gate(GateState::Open) => g(" ,, ", FLOOR, Color::Cyan),
        Tile::GateTop => g(" ## ", " ## ", Color::Cyan),
        Tile::Potion(p) => g(" () ", FLOOR, potion_color(p)),
        Tile::LooseFloor => g(OPEN, "▄▀▄▀", Color::Grey),
        Tile::Mirror => g("▐▒▒▌", "▐▒▒▌", Color::White),
        Tile::Debris => g(OPEN, "▄,▄,", Color::DarkGrey),
        Tile::Button(b) => Glyph { mark: Some(b.letter()), ..g(OPEN, "▄▂▂▄", Color::Green) },
        Tile::Door { open: false, side } => match side {
            DoorSide::Left => g("▐███", "▐███", Color::Yellow),
            DoorSide::Right => g("███▌", "███▌", Color::Yellow),
        },
        Tile::Door { open: true, side } => match side {
            DoorSide::Left => g("▐   ", "▐▄▄▄", Color::Yellow),
            DoorSide::Right => g("   ▌", "▄▄▄▌", Color::Yellow),
        },
        Tile::Chomper(Jaws::Open) => g("▌  ▐", "▌▄▄▐", Color::Red),
        Tile::Chomper(Jaws::Closed) => g(" ▐▌ ", "▄▐▌▄", Color::Red),
        Tile::Torch => g("  ' ", FLOOR, Color::DarkYellow),
        Tile::Skeleton => g(" xx ", FLOOR, Color::Grey),
        Tile::Sword => g("--+ ", FLOOR, Color::White),
        Tile::Teleport(pad) => Glyph { mark: Some(pad.letter()), ..g("(  )", FLOOR, Color::Magenta) },
        Tile::TeleportExit => g(" )) ", FLOOR, Color::Magenta),
        Tile::LatticeTop => g("╱╲╱╲", OPEN, Color::DarkGrey),
        Tile::Lattice => g("╲╱╲╱", "╲╱╲╱", Color::DarkGrey),
    }
}

fn potion_color(p: Potion) -> Color {
    match p {
        Potion::Empty => Color::DarkGrey,
        Potion::Heal => Color::Red,
        Potion::Life => Color::Magenta,
        Potion::Float => Color::Green,
        Potion::Flip => Color::Yellow,
        Potion::Hurt => Color::Blue,
        Potion::SpecialBlue => Color::Cyan,
    }
}

fn flash_bg(color: FlashColor) -> Color {
    match color {
        FlashColor::Sword => Color::Rgb { r: 60, g: 60, b: 60 },
        FlashColor::Heal => Color::Rgb { r: 80, g: 20, b: 20 },
        FlashColor::Float => Color::Rgb { r: 0, g: 60, b: 0 },
        FlashColor::Hurt => Color::Rgb { r: 20, g: 20, b: 80 },
        FlashColor::Boss => Color::Rgb { r: 110, g: 110, b: 110 },
    }
}

fn player_sprite(state: &GameState) -> &'static str {
    let p = &state.player;
    if state.phase == Phase::Dying {
        return " xx ";
    }
    match (p.motion, p.facing, p.sword) {
        (Motion::Hanging, _, _) => "\\P/ ",
        (Motion::Falling { .. }, _, _) => " vP ",
        (_, Facing::Right, SwordState::Drawn) => " P>-",
        (_, Facing::Left, SwordState::Drawn) => "-<P ",
        (_, Facing::Right, _) => " P> ",
        (_, Facing::Left, _) => " <P ",
    }
}

fn guard_sprite(guard: &Guard) -> (String, Color) {
    if !guard.is_alive() {
        return (" __ ".into(), Color::DarkGrey);
    }
    let color = match guard.kind {
        GuardKind::Easy | GuardKind::Hard | GuardKind::Boss => Color::Red,
        GuardKind::Shadow => Color::Magenta,
        GuardKind::Mouse => Color::DarkYellow,
    };
    (format!(" {}{:<2}", guard.kind.letter(), guard.hp.min(99)), color)
}

fn stride_label(stride: Stride) -> &'static str {
    match stride {
        Stride::Walk => "walk",
        Stride::Jump => "JUMP",
        Stride::Careful => "CAREFUL",
        Stride::RunJump => "RUN-JUMP",
    }
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    term_w: usize,
    term_h: usize,
    last_phase: Option<Phase>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            term_w: 0,
            term_h: 0,
            last_phase: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(Cell::BASE_BG),
            Clear(ClearType::All)
        )?;
        self.fit_terminal();
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(self.writer, ResetColor, cursor::Show, terminal::LeaveAlternateScreen)?;
        terminal::disable_raw_mode()
    }

    /// Resize both buffers to the terminal; returns whether the size changed.
    fn fit_terminal(&mut self) -> bool {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let (tw, th) = (tw as usize, th as usize);
        if tw == self.term_w && th == self.term_h {
            return false;
        }
        self.term_w = tw;
        self.term_h = th;
        self.front.resize(tw, th);
        self.back.resize(tw, th);
        self.back.cells.fill(Cell::INVALID);
        true
    }

    pub fn render(&mut self, state: &GameState, stride: Stride) -> io::Result<()> {
        let resized = self.fit_terminal();
        let phase_changed = self.last_phase != Some(state.phase);
        if resized || phase_changed {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(Cell::BASE_BG), Clear(ClearType::All))?;
            self.last_phase = Some(state.phase);
        }

        self.front.clear();
        match state.phase {
            Phase::NoLevel => self.compose_no_level(state),
            Phase::Playing | Phase::Dying => {
                self.compose_hud(state, stride);
                self.compose_view(state);
                self.compose_footer(state);
            }
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = Cell::BASE_BG;
        // Where the terminal cursor is after the last Print, if known.
        let mut cursor_at: Option<(usize, usize)> = None;

        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_hud(&mut self, state: &GameState, stride: Stride) {
        let p = &state.player;
        let sword = match p.sword {
            SwordState::None => "-",
            SwordState::Sheathed => "sheathed",
            SwordState::Drawn => "DRAWN",
        };
        let hud = format!(
            " Level {:<2}  Lives {}/{}  Sword {}  Next {} ",
            state.level, p.lives, p.max_lives, sword, stride_label(stride),
        );
        self.front.put_str(LEFT_PAD, HUD_ROW, &hud, Color::White, Cell::BASE_BG);

        let hearts: String = (0..p.max_lives).map(|i| if i < p.lives { '♥' } else { '♡' }).collect();
        self.front.put_str(LEFT_PAD + 1, HUD_ROW + 1, &hearts, Color::Red, Cell::BASE_BG);
        if p.float_ticks > 0 {
            let float = format!("float {}", p.float_ticks);
            self.front.put_str(LEFT_PAD + 14, HUD_ROW + 1, &float, Color::Green, Cell::BASE_BG);
        }
    }

    fn compose_view(&mut self, state: &GameState) {
        let room = state.current_room();
        let bg = state.flash.map_or(Cell::BASE_BG, |f| flash_bg(f.color));

        for vy in 0..VIEW_ROWS {
            for vx in 0..VIEW_COLS {
                let Some(loc) = slot_loc(&state.graph, room, vx, vy) else { continue };
                let edge = loc.room != room;
                let x = LEFT_PAD + vx * TILE_W;
                let y = VIEW_ROW + vy * TILE_H;

                let gl = glyph(state.tile(loc));
                let fg = if edge { Color::DarkGrey } else { gl.fg };
                self.front.put_str(x, y, gl.top, fg, bg);
                self.front.put_str(x, y + 1, gl.bottom, fg, bg);
                if let Some(mark) = gl.mark {
                    self.front.set(x + 1, y, Cell { ch: mark, fg, bg });
                }

                if let Some(guard) = state.guard_at(loc) {
                    let (sprite, color) = guard_sprite(guard);
                    let color = if edge { Color::DarkGrey } else { color };
                    self.front.put_str(x, y, &sprite, color, bg);
                }
                if state.drops.iter().any(|d| d.loc == loc) {
                    self.front.put_str(x, y + 1, "▄▀▄▀", Color::DarkYellow, bg);
                }
                if loc == state.player.loc {
                    self.front.put_str(x, y, player_sprite(state), Color::White, bg);
                }
            }
        }
    }

    fn compose_footer(&mut self, state: &GameState) {
        if !state.message.is_empty() {
            self.front.put_str(LEFT_PAD, MSG_ROW, &state.message, Color::Yellow, Cell::BASE_BG);
        }
        if state.show_stats {
            let stats = format!(
                "Steps {}   Coins {} / {}",
                state.player.steps, state.player.coins, state.coins_required,
            );
            self.front.put_str(LEFT_PAD, STATS_ROW, &stats, Color::Cyan, Cell::BASE_BG);
        }
        let help = "arrows move  j jump  c careful  r run-jump  s strike  Enter stats  Ctrl-A/Ctrl-R restart  Esc quit";
        self.front.put_str(LEFT_PAD, HELP_ROW, help, Color::DarkGrey, Cell::BASE_BG);
    }

    fn compose_no_level(&mut self, state: &GameState) {
        let msg = if state.message.is_empty() { "No level loaded." } else { state.message.as_str() };
        let y = self.term_h / 2;
        let x = self.term_w.saturating_sub(msg.chars().count()) / 2;
        self.front.put_str(x, y, msg, Color::Yellow, Cell::BASE_BG);
        self.front.put_str(x, y + 2, "Ctrl-R to retry, Esc to quit", Color::DarkGrey, Cell::BASE_BG);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(n: u8) -> RoomId {
        RoomId::new(n).unwrap()
    }

    #[test]
    fn inner_slots_map_row_major() {
        let graph = RoomGraph::new();
        assert_eq!(slot_loc(&graph, room(3), 1, 1), Loc::new(3, 1));
        assert_eq!(slot_loc(&graph, room(3), 10, 3), Loc::new(3, 30));
        assert_eq!(slot_loc(&graph, room(3), 4, 2), Loc::new(3, 14));
    }

    #[test]
    fn edges_show_the_facing_side_of_linked_rooms() {
        let mut graph = RoomGraph::new();
        graph.set_link(room(3), Side::Left, Some(room(2)));
        graph.set_link(room(3), Side::Right, Some(room(4)));
        graph.set_link(room(3), Side::Up, Some(room(5)));
        graph.set_link(room(3), Side::Down, Some(room(6)));
        assert_eq!(slot_loc(&graph, room(3), 0, 2), Loc::new(2, 20));
        assert_eq!(slot_loc(&graph, room(3), 11, 3), Loc::new(4, 21));
        assert_eq!(slot_loc(&graph, room(3), 7, 0), Loc::new(5, 27));
        assert_eq!(slot_loc(&graph, room(3), 2, 4), Loc::new(6, 2));
    }

    #[test]
    fn unlinked_edges_and_corners_are_blank() {
        let mut graph = RoomGraph::new();
        graph.set_link(room(3), Side::Left, Some(room(2)));
        graph.set_link(room(3), Side::Up, Some(room(5)));
        assert_eq!(slot_loc(&graph, room(3), 0, 0), None);
        assert_eq!(slot_loc(&graph, room(3), 11, 1), None);
        assert_eq!(slot_loc(&graph, room(3), 5, 4), None);
    }

    #[test]
    fn every_glyph_fits_its_slot() {
        let tiles = (0u8..=127).filter_map(|b| Tile::from_symbol(b as char));
        for tile in tiles {
            let gl = glyph(tile);
            assert_eq!(gl.top.chars().count(), TILE_W, "{tile:?}");
            assert_eq!(gl.bottom.chars().count(), TILE_W, "{tile:?}");
        }
    }
}
