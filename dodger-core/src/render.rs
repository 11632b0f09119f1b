use serde::Serialize;

use crate::entities::{Asteroid, Ship, Star};
use crate::session::SessionState;

const STAR_COLOR: &str = "white";
const HUD_COLOR: &str = "white";
const HIGH_SCORE_COLOR: &str = "yellow";
const GAME_OVER_COLOR: &str = "#0f0";

const HUD_TEXT_SIZE: f64 = 20.0;
const GAME_OVER_TEXT_SIZE: f64 = 50.0;
const PAUSED_TEXT_SIZE: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SessionMeta {
    pub elapsed: f64,
    pub high_score: i64,
    pub state: SessionState,
}

/// Read-only snapshot handed to a render sink after the update step.
#[derive(Clone, Copy, Debug)]
pub struct FrameView<'a> {
    pub width: f64,
    pub height: f64,
    pub ship: &'a Ship,
    pub asteroids: &'a [Asteroid],
    pub stars: &'a [Star],
    pub meta: SessionMeta,
}

pub trait RenderSink {
    fn draw(&mut self, frame: &FrameView<'_>);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum TextAlign {
    Left,
    Center,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DrawCommand {
    Clear {
        width: f64,
        height: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: &'static str,
    },
    /// Ship sprite placed by its top-left corner.
    Ship {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Asteroid sprite placed by its center and rotated about it.
    Asteroid {
        cx: f64,
        cy: f64,
        size: f64,
        rotation: f64,
        color: &'static str,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        size: f64,
        align: TextAlign,
        color: &'static str,
    },
}

/// 2D target that executes draw commands in order.
pub trait Surface {
    fn apply(&mut self, command: DrawCommand);
}

/// Draw commands for one frame, back to front.
pub fn frame_commands(view: &FrameView<'_>) -> Vec<DrawCommand> {
    let state = view.meta.state;
    let mut commands = Vec::with_capacity(view.stars.len() + view.asteroids.len() + 6);

    commands.push(DrawCommand::Clear {
        width: view.width,
        height: view.height,
    });

    commands.extend(view.stars.iter().map(|star| DrawCommand::FillRect {
        x: star.x,
        y: star.y,
        width: star.size,
        height: star.size,
        color: STAR_COLOR,
    }));

    if state.is_started() && state != SessionState::GameOver {
        commands.push(DrawCommand::Ship {
            x: view.ship.x,
            y: view.ship.y,
            width: view.ship.width,
            height: view.ship.height,
        });
    }

    commands.extend(view.asteroids.iter().map(|asteroid| {
        let (cx, cy) = asteroid.center();
        DrawCommand::Asteroid {
            cx,
            cy,
            size: asteroid.size,
            rotation: asteroid.rotation,
            color: asteroid.color,
        }
    }));

    if state.is_started() {
        commands.push(text(
            format!("Time: {:.1}s", view.meta.elapsed),
            10.0,
            30.0,
            HUD_TEXT_SIZE,
            TextAlign::Left,
            HUD_COLOR,
        ));
        commands.push(text(
            format!("High Score: {:.1}s", view.meta.high_score as f64),
            10.0,
            60.0,
            HUD_TEXT_SIZE,
            TextAlign::Left,
            HIGH_SCORE_COLOR,
        ));
    }

    match state {
        SessionState::GameOver => {
            commands.push(text(
                "GAME OVER!".to_string(),
                view.width / 2.0,
                view.height / 2.0 - 20.0,
                GAME_OVER_TEXT_SIZE,
                TextAlign::Center,
                GAME_OVER_COLOR,
            ));
            commands.push(text(
                "Press R to Restart".to_string(),
                view.width / 2.0,
                view.height / 2.0 + 30.0,
                HUD_TEXT_SIZE,
                TextAlign::Center,
                GAME_OVER_COLOR,
            ));
        }
        SessionState::Paused => {
            commands.push(text(
                "Paused".to_string(),
                view.width / 2.0 - 50.0,
                view.height / 2.0,
                PAUSED_TEXT_SIZE,
                TextAlign::Left,
                HUD_COLOR,
            ));
        }
        SessionState::NotStarted | SessionState::Running => {}
    }

    commands
}

pub fn draw_frame(surface: &mut impl Surface, view: &FrameView<'_>) {
    for command in frame_commands(view) {
        surface.apply(command);
    }
}

fn text(
    text: String,
    x: f64,
    y: f64,
    size: f64,
    align: TextAlign,
    color: &'static str,
) -> DrawCommand {
    DrawCommand::Text {
        text,
        x,
        y,
        size,
        align,
        color,
    }
}

/// Render sink that forwards every frame to a [`Surface`].
#[derive(Clone, Debug, Default)]
pub struct SurfaceRenderer<S> {
    surface: S,
    frames: u64,
}

impl<S: Surface> SurfaceRenderer<S> {
    pub fn new(surface: S) -> Self {
        Self { surface, frames: 0 }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn into_surface(self) -> S {
        self.surface
    }
}

impl<S: Surface> RenderSink for SurfaceRenderer<S> {
    fn draw(&mut self, frame: &FrameView<'_>) {
        draw_frame(&mut self.surface, frame);
        self.frames += 1;
    }
}

/// Ignores frames entirely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullRenderer;

impl RenderSink for NullRenderer {
    fn draw(&mut self, _frame: &FrameView<'_>) {}
}

/// Keeps the commands of the most recent frame.
#[derive(Clone, Debug, Default)]
pub struct CommandRecorder {
    commands: Vec<DrawCommand>,
}

impl CommandRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Text lines of the recorded frame, in draw order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl Surface for CommandRecorder {
    fn apply(&mut self, command: DrawCommand) {
        if matches!(command, DrawCommand::Clear { .. }) {
            self.commands.clear();
        }
        self.commands.push(command);
    }
}

/// Coarse character grid for terminals and logs.
#[derive(Clone, Debug)]
pub struct TextSurface {
    columns: usize,
    rows: usize,
    cell_width: f64,
    cell_height: f64,
    cells: Vec<char>,
}

impl TextSurface {
    pub fn new(columns: usize, rows: usize) -> Self {
        let columns = columns.max(1);
        let rows = rows.max(1);
        Self {
            columns,
            rows,
            cell_width: 1.0,
            cell_height: 1.0,
            cells: vec![' '; columns * rows],
        }
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.columns + 1) * self.rows);
        for row in self.cells.chunks(self.columns) {
            out.extend(row.iter());
            out.push('\n');
        }
        out
    }

    fn cell_of(&self, x: f64, y: f64) -> Option<(usize, usize)> {
        let column = (x / self.cell_width).floor();
        let row = (y / self.cell_height).floor();
        if !(column >= 0.0 && row >= 0.0) {
            return None;
        }
        let (column, row) = (column as usize, row as usize);
        (column < self.columns && row < self.rows).then_some((column, row))
    }

    fn plot(&mut self, x: f64, y: f64, glyph: char) {
        if let Some((column, row)) = self.cell_of(x, y) {
            self.cells[row * self.columns + column] = glyph;
        }
    }

    fn fill_box(&mut self, x: f64, y: f64, width: f64, height: f64, glyph: char) {
        let x0 = (x / self.cell_width).floor().max(0.0) as usize;
        let y0 = (y / self.cell_height).floor().max(0.0) as usize;
        let x1 = ((x + width) / self.cell_width).ceil().max(0.0) as usize;
        let y1 = ((y + height) / self.cell_height).ceil().max(0.0) as usize;
        for row in y0..y1.min(self.rows) {
            for column in x0..x1.min(self.columns) {
                self.cells[row * self.columns + column] = glyph;
            }
        }
    }

    fn write_text(&mut self, text: &str, x: f64, y: f64, align: TextAlign) {
        let length = text.chars().count() as f64 * self.cell_width;
        let start_x = match align {
            TextAlign::Left => x,
            TextAlign::Center => x - length / 2.0,
        };
        // Canvas text is placed by its baseline.
        let line_y = (y - self.cell_height / 2.0).max(0.0);
        for (offset, glyph) in text.chars().enumerate() {
            self.plot(start_x + offset as f64 * self.cell_width, line_y, glyph);
        }
    }
}

impl Surface for TextSurface {
    fn apply(&mut self, command: DrawCommand) {
        match command {
            DrawCommand::Clear { width, height } => {
                self.cell_width = (width / self.columns as f64).max(f64::MIN_POSITIVE);
                self.cell_height = (height / self.rows as f64).max(f64::MIN_POSITIVE);
                self.cells.fill(' ');
            }
            DrawCommand::FillRect { x, y, .. } => self.plot(x, y, '.'),
            DrawCommand::Ship {
                x,
                y,
                width,
                height,
            } => self.fill_box(x, y, width, height, '>'),
            DrawCommand::Asteroid { cx, cy, size, .. } => {
                let half = size / 2.0;
                self.fill_box(cx - half, cy - half, size, size, '@');
            }
            DrawCommand::Text {
                text, x, y, align, ..
            } => self.write_text(&text, x, y, align),
        }
    }
}
