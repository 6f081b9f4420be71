//! Terminal setup and management

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Frame, Terminal};
use std::io::{self, Stdout};

/// Terminal configuration
#[derive(Debug, Clone)]
pub struct TerminalConfig {
    /// Enable mouse support
    pub mouse_enabled: bool,

    /// Use alternate screen
    pub alternate_screen: bool,

    /// Enable raw mode
    pub raw_mode: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            mouse_enabled: false,
            alternate_screen: true,
            raw_mode: true,
        }
    }
}

/// Terminal manager wrapping ratatui Terminal
///
/// Restores the terminal when dropped, including on early returns.
pub struct TerminalManager {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    config: TerminalConfig,
}

impl TerminalManager {
    /// Initialize terminal with configuration
    pub fn new(config: TerminalConfig) -> Result<Self> {
        if config.raw_mode {
            enable_raw_mode()?;
        }

        let mut stdout = io::stdout();

        if config.alternate_screen {
            execute!(stdout, EnterAlternateScreen)?;
        }

        if config.mouse_enabled {
            execute!(stdout, EnableMouseCapture)?;
        }

        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self { terminal, config })
    }

    /// Draw one frame
    pub fn draw<F>(&mut self, render: F) -> Result<()>
    where
        F: FnOnce(&mut Frame),
    {
        self.terminal.draw(render)?;
        Ok(())
    }
}

impl Drop for TerminalManager {
    fn drop(&mut self) {
        if self.config.raw_mode {
            let _ = disable_raw_mode();
        }

        if self.config.mouse_enabled {
            let _ = execute!(io::stdout(), DisableMouseCapture);
        }

        if self.config.alternate_screen {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}
