use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, DisableLineWrap, EnableLineWrap, EndSynchronizedUpdate,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};

use crate::configuration::config::ViewConfig;
use crate::playback::controller::{BodySink, PlaybackController, PositionTable, TickOutcome};
use crate::playback::scheduler::{LoopControl, Scheduler, WallClockTicks};
use crate::playback::state::ControlEvent;
use crate::simulation::states::NVec3;

/// Terminal cells are roughly twice as tall as wide
const CELL_ASPECT: f64 = 2.0;

const PAN_STEP: f64 = 0.1; // fraction of the visible range per key press
const ZOOM_STEP: f64 = 1.15;
const MIN_ZOOM: f64 = 0.05;
const MAX_ZOOM: f64 = 50.0;

const PALETTE: [Color; 7] = [
    Color::Red,
    Color::Cyan,
    Color::Yellow,
    Color::Green,
    Color::Magenta,
    Color::Rgb { r: 255, g: 165, b: 0 }, // orange
    Color::White,
];

/// Top-down camera over the XY plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub zoom: f64,
    pub pan_x: f64, // world meters at the view centre
    pub pan_y: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

impl Camera {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// What a key press asks for
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewAction {
    Control(ControlEvent),
    Pan(f64, f64), // in units of the visible half-range
    Zoom(f64),     // multiplicative
    Quit,
}

pub fn key_action(code: KeyCode) -> Option<ViewAction> {
    let action = match code {
        KeyCode::Char(' ') | KeyCode::Char('p') | KeyCode::Char('P') => {
            ViewAction::Control(ControlEvent::TogglePlay)
        }
        KeyCode::Char('+') | KeyCode::Char('=') => ViewAction::Control(ControlEvent::SpeedUp),
        KeyCode::Char('-') | KeyCode::Char('_') => ViewAction::Control(ControlEvent::SpeedDown),
        KeyCode::Char('r') | KeyCode::Char('R') => ViewAction::Control(ControlEvent::ResetView),
        KeyCode::Left => ViewAction::Pan(-PAN_STEP, 0.0),
        KeyCode::Right => ViewAction::Pan(PAN_STEP, 0.0),
        KeyCode::Up => ViewAction::Pan(0.0, PAN_STEP),
        KeyCode::Down => ViewAction::Pan(0.0, -PAN_STEP),
        KeyCode::Char('w') | KeyCode::Char('W') => ViewAction::Zoom(ZOOM_STEP),
        KeyCode::Char('s') | KeyCode::Char('S') => ViewAction::Zoom(1.0 / ZOOM_STEP),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => ViewAction::Quit,
        _ => return None,
    };
    Some(action)
}

/// Terminal rendering collaborator: body positions, trails and a camera
pub struct TerminalView {
    table: PositionTable,
    trails: Vec<VecDeque<NVec3>>,
    trail_len: usize,
    scene_range: f64,
    camera: Camera,
    restarts: u64,
}

impl TerminalView {
    pub fn new(bodies: usize, cfg: &ViewConfig) -> Self {
        Self {
            table: PositionTable::new(bodies),
            trails: vec![VecDeque::new(); bodies],
            trail_len: cfg.trail_len,
            scene_range: cfg.scene_range,
            camera: Camera::default(),
            restarts: 0,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn positions(&self) -> &PositionTable {
        &self.table
    }

    pub fn trail(&self, slot: usize) -> Option<&VecDeque<NVec3>> {
        self.trails.get(slot)
    }

    /// Apply a key action. Returns `Stop` on quit.
    pub fn handle(&mut self, action: ViewAction, controller: &mut PlaybackController) -> LoopControl {
        match action {
            ViewAction::Control(event) => {
                if event == ControlEvent::ResetView {
                    self.camera.reset();
                }
                controller.handle(event);
            }
            ViewAction::Pan(dx, dy) => {
                let visible = self.scene_range / self.camera.zoom;
                self.camera.pan_x += dx * visible;
                self.camera.pan_y += dy * visible;
            }
            ViewAction::Zoom(f) => {
                self.camera.zoom = (self.camera.zoom * f).clamp(MIN_ZOOM, MAX_ZOOM);
            }
            ViewAction::Quit => return LoopControl::Stop,
        }
        LoopControl::Continue
    }

    /// World XY to a cell in a `w` x `h` viewport, if it lands inside
    pub fn project(&self, x: &NVec3, w: u16, h: u16) -> Option<(u16, u16)> {
        if w == 0 || h == 0 {
            return None;
        }
        let half_w = f64::from(w) / 2.0;
        let half_h = f64::from(h) / 2.0;
        // cells per meter, fitted to the shorter half-extent
        let scale = half_h.min(half_w / CELL_ASPECT) * self.camera.zoom / self.scene_range;

        let col = half_w + (x.x - self.camera.pan_x) * scale * CELL_ASPECT;
        let row = half_h - (x.y - self.camera.pan_y) * scale;
        if !(0.0..f64::from(w)).contains(&col) || !(0.0..f64::from(h)).contains(&row) {
            return None;
        }
        Some((col as u16, row as u16))
    }

    fn draw(&self, out: &mut Stdout, controller: &PlaybackController) -> io::Result<()> {
        let (w, h) = terminal::size()?;
        let view_h = h.saturating_sub(1); // last row is the status line
        let cells = usize::from(w) * usize::from(view_h);
        let mut buf: Vec<(char, Color)> = vec![(' ', Color::Reset); cells];

        let mut put = |cell: (u16, u16), ch: char, color: Color| {
            let idx = usize::from(cell.1) * usize::from(w) + usize::from(cell.0);
            if let Some(slot) = buf.get_mut(idx) {
                *slot = (ch, color);
            }
        };

        // axes through the world origin
        if let Some((ox, oy)) = self.project(&NVec3::zeros(), w, view_h) {
            let axis = Color::Rgb { r: 60, g: 60, b: 60 };
            for x in 0..w {
                put((x, oy), '·', axis);
            }
            for y in 0..view_h {
                put((ox, y), '·', axis);
            }
        }

        for (slot, trail) in self.trails.iter().enumerate() {
            let color = PALETTE[slot % PALETTE.len()];
            for p in trail {
                if let Some(cell) = self.project(p, w, view_h) {
                    put(cell, '.', color);
                }
            }
        }
        for (slot, pos) in self.table.positions().iter().enumerate() {
            let color = PALETTE[slot % PALETTE.len()];
            if let Some(cell) = pos.and_then(|p| self.project(&p, w, view_h)) {
                put(cell, '●', color);
            }
        }

        queue!(out, BeginSynchronizedUpdate)?;
        let mut current = Color::Reset;
        for y in 0..view_h {
            queue!(out, cursor::MoveTo(0, y))?;
            let row = usize::from(y) * usize::from(w);
            for &(ch, color) in &buf[row..row + usize::from(w)] {
                if color != current {
                    queue!(out, SetForegroundColor(color))?;
                    current = color;
                }
                queue!(out, Print(ch))?;
            }
        }

        let state = controller.state();
        let status = format!(
            " {} | Speed: {} fps | step {}/{} | {} bodies | restarts {} | zoom {:.2}x | space pause  +/- speed  r reset  q quit",
            if state.is_running() { "Playing" } else { "Paused " },
            state.speed(),
            state.current_step(),
            controller.trajectory().num_steps(),
            self.table.positions().len(),
            self.restarts,
            self.camera.zoom,
        );
        let status: String = status.chars().take(usize::from(w)).collect();
        queue!(
            out,
            ResetColor,
            cursor::MoveTo(0, view_h),
            terminal::Clear(terminal::ClearType::CurrentLine),
            Print(status),
            EndSynchronizedUpdate
        )?;
        out.flush()
    }
}

impl BodySink for TerminalView {
    fn set_position(&mut self, slot: usize, body_id: u64, x: NVec3) {
        self.table.set_position(slot, body_id, x);
        if slot >= self.trails.len() {
            self.trails.resize(slot + 1, VecDeque::new());
        }
        let trail = &mut self.trails[slot];
        trail.push_back(x);
        while trail.len() > self.trail_len {
            trail.pop_front();
        }
    }

    fn on_restart(&mut self) {
        self.restarts += 1;
    }
}

/// Interactive playback in the alternate screen until the user quits
pub fn run_terminal(mut controller: PlaybackController, cfg: &ViewConfig) -> io::Result<()> {
    let mut out = io::stdout();
    terminal::enable_raw_mode()?;
    execute!(out, EnterAlternateScreen, DisableLineWrap, cursor::Hide)?;

    let res = play(&mut out, &mut controller, cfg);

    execute!(out, ResetColor, cursor::Show, EnableLineWrap, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    res
}

fn play(out: &mut Stdout, controller: &mut PlaybackController, cfg: &ViewConfig) -> io::Result<()> {
    let mut view = TerminalView::new(controller.trajectory().bodies().len(), cfg);
    let mut scheduler = Scheduler::new(WallClockTicks::new());

    scheduler.run(controller, &mut view, |controller, view, _: TickOutcome| -> io::Result<LoopControl> {
        // input (non-blocking), applied between ticks
        while event::poll(Duration::ZERO)? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = key_action(k.code) {
                    if view.handle(action, controller) == LoopControl::Stop {
                        return Ok(LoopControl::Stop);
                    }
                }
            }
        }
        view.draw(out, controller)?;
        Ok(LoopControl::Continue)
    })?;
    Ok(())
}
