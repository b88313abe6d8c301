use std::io::{self, Write};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use thiserror::Error;

use crate::error::WidgetError;
use crate::geometry::Size;
use crate::runtime::PageRuntime;

pub type DriverResult<T> = std::result::Result<T, CliDriverError>;

#[derive(Debug, Error)]
pub enum CliDriverError {
    #[error("runtime error: {0}")]
    Runtime(#[from] WidgetError),
    #[error("terminal error: {0}")]
    Terminal(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Owns a [`PageRuntime`] and manages raw mode, mouse capture and the
/// alternate screen around it. The terminal is restored even when the
/// runtime fails.
pub struct CliDriver {
    runtime: PageRuntime,
}

impl CliDriver {
    pub fn new(runtime: PageRuntime) -> Self {
        Self { runtime }
    }

    pub fn run(mut self) -> DriverResult<PageRuntime> {
        let mut stdout = io::stdout();
        self.enter(&mut stdout)?;
        let result = self.run_inner();
        self.exit(&mut stdout);
        result.map(|()| self.runtime)
    }

    fn run_inner(&mut self) -> DriverResult<()> {
        let (width, height) = terminal::size()?;
        self.runtime
            .dispatch(crate::event::PageEvent::Resize(Size::new(width, height)))?;
        self.runtime.run()?;
        Ok(())
    }

    fn enter(&self, stdout: &mut impl Write) -> DriverResult<()> {
        terminal::enable_raw_mode().map_err(|err| CliDriverError::Terminal(err.to_string()))?;
        prepare_screen(stdout)
    }

    fn exit(&self, stdout: &mut impl Write) {
        restore_terminal(stdout);
    }
}

/// Raw mode is already on here; it is switched back off if the screen cannot
/// be prepared.
fn prepare_screen(stdout: &mut impl Write) -> DriverResult<()> {
    if let Err(err) = execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        Hide,
        Clear(ClearType::All)
    ) {
        restore_terminal(stdout);
        return Err(err.into());
    }
    Ok(())
}

fn restore_terminal(stdout: &mut impl Write) {
    execute!(stdout, Show, DisableMouseCapture, LeaveAlternateScreen).ok();
    terminal::disable_raw_mode().ok();
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[derive(Default)]
    struct BrokenTerminal {
        attempts: usize,
    }

    impl Write for BrokenTerminal {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            self.attempts += 1;
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal gone"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_screen_setup_restores_terminal() {
        let mut terminal = BrokenTerminal::default();
        let err = prepare_screen(&mut terminal).unwrap_err();
        assert!(matches!(err, CliDriverError::Io(_)));
        assert!(terminal.attempts >= 2);
    }
}
