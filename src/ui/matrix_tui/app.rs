use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::dashboard::{
    run_render_loop, DisplaySurface, LinkOpener, SamplerRuntime, SamplerSchedule, Samplers, Scene,
    Scheduler, SchedulerConfig, SurfaceEvent,
};
use crate::error::Result as MonitorResult;

use super::event_handler::map_event;
use super::render::render_scene;

/// Everything the terminal dashboard needs to start.
pub struct DashboardApp {
    pub samplers: Samplers,
    pub schedule: SamplerSchedule,
    pub history_capacity: usize,
    pub scheduler: SchedulerConfig,
}

/// Display surface backed by the real terminal.
pub struct TerminalSurface {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSurface {
    /// Switch the terminal into dashboard mode.
    pub fn enter() -> Result<Self> {
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen, EnableMouseCapture) {
            let _ = disable_raw_mode();
            return Err(e).context("Failed to enter alternate screen");
        }

        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;

        Ok(Self { terminal })
    }

    /// Give the terminal back to the shell.
    pub fn restore(&mut self) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(
            self.terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )
        .context("Failed to leave alternate screen")?;
        self.terminal.show_cursor().context("Failed to show cursor")?;

        Ok(())
    }
}

impl DisplaySurface for TerminalSurface {
    fn size(&self) -> MonitorResult<(u16, u16)> {
        let size = self.terminal.size()?;
        Ok((size.width, size.height))
    }

    fn present(&mut self, scene: &Scene) -> MonitorResult<()> {
        self.terminal.draw(|frame| render_scene(frame, scene))?;
        Ok(())
    }

    fn poll_event(&mut self, timeout: Duration) -> MonitorResult<Option<SurfaceEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(event::read()?))
    }
}

/// Run the dashboard until the user quits.
///
/// Samplers run on their own runtime; the render loop owns this thread.
/// The terminal is restored even when the loop fails.
pub fn run_dashboard_app(app: DashboardApp, opener: &dyn LinkOpener) -> Result<()> {
    let runtime = SamplerRuntime::start(app.samplers, app.schedule, app.history_capacity)
        .context("Failed to start samplers")?;

    let mut surface = match TerminalSurface::enter() {
        Ok(surface) => surface,
        Err(e) => {
            runtime.shutdown();
            return Err(e);
        }
    };

    let mut scheduler = Scheduler::new(runtime.context.clone(), app.scheduler);
    let result = run_render_loop(&mut scheduler, &mut surface, opener);

    // The loop may have failed without clearing the flag.
    scheduler.stop();
    let restored = surface.restore();
    runtime.shutdown();

    result.context("Render loop failed")?;
    restored
}
