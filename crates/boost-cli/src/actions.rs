//! CI runner integration via workflow commands.
//!
//! Everything the runner understands is plain text on stdout
//! (`::group::`, `::debug::`, `::error::`) plus the `$GITHUB_OUTPUT` file
//! for step outputs.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Mutex;

use boost_core::{InstallState, Reporter};

/// Escape a message so the runner does not interpret it as several commands.
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[derive(Debug, Default)]
struct State {
    group_open: bool,
    last_percent: Option<u64>,
    pauses: u64,
}

/// Whether the runner would parse some line of `msg` as a command.
fn looks_like_command(msg: &str) -> bool {
    msg.lines().any(|line| line.trim_start().starts_with("::"))
}

/// [`Reporter`] that speaks the runner's workflow-command dialect.
#[derive(Debug)]
pub struct ActionsReporter<W: Write + Send> {
    out: Mutex<W>,
    state: Mutex<State>,
}

impl ActionsReporter<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> ActionsReporter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            state: Mutex::new(State::default()),
        }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn line(&self, text: &str) {
        let mut out = self.out.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        // A closed stdout is not worth failing the install over.
        let _ = writeln!(out, "{text}");
        let _ = out.flush();
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> T {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        f(&mut state)
    }
}

impl<W: Write + Send> Reporter for ActionsReporter<W> {
    fn section(&self, title: &str) {
        self.with_state(|s| {
            s.group_open = true;
            s.last_percent = None;
        });
        self.line(&format!("::group::{}", escape_data(title)));
    }

    fn end_section(&self) {
        if self.with_state(|s| std::mem::take(&mut s.group_open)) {
            self.line("::endgroup::");
        }
    }

    fn transition(&self, state: InstallState) {
        if state == InstallState::Failed {
            self.end_section();
        }
    }

    fn downloading(&self, current: u64, total: Option<u64>) {
        let Some(total) = total.filter(|t| *t > 0) else {
            return;
        };
        let percent = (current.min(total) * 100) / total;
        let advanced = self.with_state(|s| {
            if s.last_percent.is_some_and(|last| last >= percent) {
                false
            } else {
                s.last_percent = Some(percent);
                true
            }
        });
        if advanced {
            self.line(&format!("Download progress: {percent}%"));
        }
    }

    fn info(&self, msg: &str) {
        if !looks_like_command(msg) {
            self.line(msg);
            return;
        }
        // Pause command processing so the message is shown verbatim.
        let n = self.with_state(|s| {
            s.pauses += 1;
            s.pauses
        });
        let token = format!("boost-log-{}-{n}", std::process::id());
        self.line(&format!("::stop-commands::{token}"));
        self.line(msg);
        self.line(&format!("::{token}::"));
    }

    fn debug(&self, msg: &str) {
        self.line(&format!("::debug::{}", escape_data(msg)));
    }
}

/// Where step outputs are published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outputs {
    /// Append `NAME=value` lines to this file (`$GITHUB_OUTPUT`).
    File(PathBuf),
    /// Print the legacy `::set-output` command.
    Stdout,
}

impl Outputs {
    /// Uses `$GITHUB_OUTPUT` when the runner provides it.
    pub fn from_env() -> Self {
        match std::env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Stdout,
        }
    }

    /// Publishes one output.
    ///
    /// # Errors
    ///
    /// Returns an error if the output file cannot be opened or written.
    pub fn set(&self, name: &str, value: &str) -> io::Result<()> {
        match self {
            Self::File(path) => {
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                writeln!(file, "{name}={value}")
            }
            Self::Stdout => {
                println!("::set-output name={name}::{}", escape_data(value));
                Ok(())
            }
        }
    }
}

/// Marks the step as failed with `message` as its primary diagnostic.
pub fn set_failed(message: &str) {
    println!("::error::{}", escape_data(message));
}
