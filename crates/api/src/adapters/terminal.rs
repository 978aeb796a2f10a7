//! Authorization surface backed by a terminal
//!
//! The user opens the printed authorization URL in any browser, signs in and
//! pastes the address the browser lands on. Input is read on a background
//! thread; each `current_url` call waits at most the read timeout for a
//! pasted line and otherwise reports the previous URL, so the login flow
//! keeps checking its deadline and cancellation while the terminal is idle.

use std::io::{self, BufRead, BufReader, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use parking_lot::Mutex;
use vknet_common::auth::{AuthError, AuthorizationSurface, Credentials};

/// How long `current_url` waits for a pasted line.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

type Line = io::Result<String>;

/// Terminal-driven [`AuthorizationSurface`]
///
/// Cannot fill in forms, so it always reports no login form and no allow
/// button. Pair it with an acquisition request without credentials.
pub struct TerminalSurface {
    input: Mutex<Option<Box<dyn BufRead + Send>>>,
    lines: Mutex<Option<Receiver<Line>>>,
    output: Mutex<Box<dyn Write + Send>>,
    current: Mutex<String>,
    read_timeout: Duration,
}

impl TerminalSurface {
    /// Surface reading from stdin and prompting on stderr.
    #[must_use]
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stderr())
    }

    pub fn new(input: impl BufRead + Send + 'static, output: impl Write + Send + 'static) -> Self {
        Self {
            input: Mutex::new(Some(Box::new(input))),
            lines: Mutex::new(None),
            output: Mutex::new(Box::new(output)),
            current: Mutex::new(String::new()),
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    fn prompt(&self, text: &str) -> Result<(), AuthError> {
        let mut output = self.output.lock();
        writeln!(output, "{text}")
            .and_then(|()| output.flush())
            .map_err(|e| AuthError::failure_with("failed to write to terminal", e))
    }

    /// Hand the input over to a reader thread. Later sign-ins reuse it.
    fn start_reader(&self) -> Result<(), AuthError> {
        let Some(mut input) = self.input.lock().take() else {
            return Ok(());
        };

        let (tx, rx) = mpsc::channel::<Line>();
        thread::Builder::new()
            .name("vknet-terminal-input".to_string())
            .spawn(move || loop {
                let mut line = String::new();
                match input.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            })
            .map_err(|e| AuthError::failure_with("failed to start terminal reader", e))?;

        *self.lines.lock() = Some(rx);
        Ok(())
    }
}

impl AuthorizationSurface for TerminalSurface {
    fn open(&self, url: &str) -> Result<(), AuthError> {
        url.clone_into(&mut self.current.lock());
        self.prompt(&format!(
            "Open this address in a browser and sign in:\n\n  {url}\n\n\
             Then paste the address of the page you land on and press Enter."
        ))?;
        self.start_reader()
    }

    fn current_url(&self) -> Result<String, AuthError> {
        let lines = self.lines.lock();
        let Some(lines) = lines.as_ref() else {
            return Err(AuthError::failure("authorization page was not opened"));
        };

        match lines.recv_timeout(self.read_timeout) {
            Ok(Ok(line)) => {
                let pasted = line.trim();
                if !pasted.is_empty() {
                    pasted.clone_into(&mut self.current.lock());
                }
            }
            Ok(Err(e)) => return Err(AuthError::failure_with("failed to read from terminal", e)),
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                return Err(AuthError::failure("input closed before sign-in completed"));
            }
        }

        Ok(self.current.lock().clone())
    }

    fn has_login_form(&self) -> Result<bool, AuthError> {
        Ok(false)
    }

    fn submit_login(&self, _credentials: &Credentials) -> Result<(), AuthError> {
        Err(AuthError::failure("a terminal cannot fill in the login form"))
    }

    fn has_allow_button(&self) -> Result<bool, AuthError> {
        Ok(false)
    }

    fn click_allow(&self) -> Result<(), AuthError> {
        Err(AuthError::failure("a terminal cannot accept permissions"))
    }

    fn close(&self) -> Result<(), AuthError> {
        self.current.lock().clear();
        Ok(())
    }
}
