/// Terminal frontend for the bin scene
use bin3d_core::{AnimationDriver, BinScene, PointerEvent, ViewConfig, ViewDelta};
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self},
};
use std::io::{self, stdout, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info};

pub mod renderer;

pub use renderer::TerminalSurface;

/// Frame pacing and keyboard tunables.
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    pub target_fps: u32,
    /// Drag distance, in surface pixels, of one arrow key press.
    pub key_step: f64,
    /// Wheel units per scroll notch or `+`/`-` press.
    pub wheel_step: f64,
    pub view: ViewConfig,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            target_fps: 30,
            key_step: 10.0,
            wheel_step: 100.0,
            view: ViewConfig::default(),
        }
    }
}

/// Main application struct for the terminal bin scene
pub struct TerminalApp {
    driver: AnimationDriver<BinScene>,
    surface: TerminalSurface,
    config: TerminalConfig,
    running: bool,
    last_tick: Instant,
    last_fps_sample: Instant,
    frame_count: u32,
    fps: f32,
}

impl TerminalApp {
    pub fn new(config: TerminalConfig) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(config, width, height))
    }

    /// App for a terminal of the given size, without touching the tty.
    pub fn with_size(config: TerminalConfig, cols: u16, rows: u16) -> Self {
        Self {
            driver: AnimationDriver::new(config.view.clone(), BinScene::new()),
            surface: TerminalSurface::new(cols as usize, rows as usize),
            config,
            running: true,
            last_tick: Instant::now(),
            last_fps_sample: Instant::now(),
            frame_count: 0,
            fps: 0.0,
        }
    }

    pub fn driver(&self) -> &AnimationDriver<BinScene> {
        &self.driver
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            stdout(),
            terminal::EnterAlternateScreen,
            cursor::Hide,
            EnableMouseCapture
        )?;
        info!("terminal renderer started");

        let result = self.main_loop();

        // Cleanup
        execute!(
            stdout(),
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show
        )?;
        terminal::disable_raw_mode()?;
        info!(frames = self.driver.frames(), "terminal renderer stopped");

        result
    }

    fn main_loop(&mut self) -> io::Result<()> {
        let target_frame_time = Duration::from_millis(1000 / self.config.target_fps.max(1) as u64);

        while self.running {
            let frame_start = Instant::now();

            // Handle input
            while event::poll(Duration::from_millis(0))? {
                self.handle_event(event::read()?);
            }
            if !self.running {
                break;
            }

            // Update and draw
            let dt = self.last_tick.elapsed().as_secs_f64();
            self.last_tick = Instant::now();
            self.driver.frame(dt, &mut self.surface);
            self.present()?;

            // Frame timing
            self.frame_count += 1;
            let elapsed = frame_start.elapsed();
            if elapsed < target_frame_time {
                std::thread::sleep(target_frame_time - elapsed);
            }

            // Update FPS counter
            let now = Instant::now();
            if (now - self.last_fps_sample).as_secs() >= 1 {
                self.fps = self.frame_count as f32 / (now - self.last_fps_sample).as_secs_f32();
                self.frame_count = 0;
                self.last_fps_sample = now;
            }
        }

        Ok(())
    }

    /// Translate one terminal event into driver input.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            Event::Resize(cols, rows) => {
                debug!(cols, rows, "terminal resized");
                self.surface.resize(cols as usize, rows as usize);
            }
            _ => {}
        }
    }

    fn handle_key(&mut self, KeyEvent { code, modifiers, kind, .. }: KeyEvent) {
        if kind == KeyEventKind::Release {
            return;
        }
        let step = self.config.key_step;
        let delta = match code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
                None
            }
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                self.running = false;
                None
            }
            KeyCode::Char('w') | KeyCode::Up => Some(ViewDelta::Drag { dx: 0.0, dy: -step }),
            KeyCode::Char('s') | KeyCode::Down => Some(ViewDelta::Drag { dx: 0.0, dy: step }),
            KeyCode::Char('a') | KeyCode::Left => Some(ViewDelta::Drag { dx: -step, dy: 0.0 }),
            KeyCode::Char('d') | KeyCode::Right => Some(ViewDelta::Drag { dx: step, dy: 0.0 }),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(ViewDelta::Zoom {
                delta: -self.config.wheel_step,
            }),
            KeyCode::Char('-') => Some(ViewDelta::Zoom {
                delta: self.config.wheel_step,
            }),
            _ => None,
        };
        if let Some(delta) = delta {
            self.driver.push_delta(delta);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let (x, y) = self.surface.cell_to_pixel(mouse.column, mouse.row);
        let event = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => PointerEvent::Press { x, y },
            MouseEventKind::Drag(MouseButton::Left) => PointerEvent::Move { x, y },
            MouseEventKind::Up(MouseButton::Left) => PointerEvent::Release,
            MouseEventKind::ScrollUp => PointerEvent::Wheel {
                delta_y: -self.config.wheel_step,
            },
            MouseEventKind::ScrollDown => PointerEvent::Wheel {
                delta_y: self.config.wheel_step,
            },
            _ => return,
        };
        self.driver.handle_pointer(event);
    }

    fn present(&self) -> io::Result<()> {
        let mut stdout = stdout();
        self.surface.draw(&mut stdout)?;

        // Draw UI overlay
        let view = self.driver.view();
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            SetForegroundColor(Color::Yellow),
            Print(format!(
                "bin3d | FPS: {:.1} | yaw {:.2} pitch {:.2} zoom {:.2} | drag/WASD=rotate wheel/+-=zoom Q=quit",
                self.fps,
                view.rotation_y(),
                view.rotation_x(),
                view.zoom()
            )),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        let mut app = TerminalApp::with_size(TerminalConfig::default(), 80, 24);
        app.handle_event(key(KeyCode::Char('x')));
        assert!(app.is_running());
        app.handle_event(key(KeyCode::Esc));
        assert!(!app.is_running());
    }

    #[test]
    fn test_keys_queue_deltas() {
        let mut app = TerminalApp::with_size(TerminalConfig::default(), 80, 24);
        let yaw = app.driver().view().rotation_y();
        app.handle_event(key(KeyCode::Right));
        app.handle_event(key(KeyCode::Char('-')));
        app.driver.tick(0.0);
        let view = app.driver().view();
        assert!((view.rotation_y() - (yaw + 0.004 + 0.1)).abs() < 1e-12);
        assert!((view.zoom() - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_mouse_drag_rotates() {
        let mut app = TerminalApp::with_size(TerminalConfig::default(), 100, 30);
        let pitch = app.driver().view().rotation_x();
        app.handle_event(mouse(MouseEventKind::Down(MouseButton::Left), 10, 10));
        app.handle_event(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 9));
        app.handle_event(mouse(MouseEventKind::Up(MouseButton::Left), 10, 9));
        app.driver.tick(0.0);
        // one row up is two subpixels of 10px
        assert!((app.driver().view().rotation_x() - (pitch - 20.0 * 0.005)).abs() < 1e-12);
    }

    #[test]
    fn test_resize_rescales_surface() {
        let mut app = TerminalApp::with_size(TerminalConfig::default(), 80, 24);
        app.handle_event(Event::Resize(120, 50));
        assert_eq!(app.surface.cols(), 120);
        assert_eq!(app.surface.rows(), 50);
    }
}
