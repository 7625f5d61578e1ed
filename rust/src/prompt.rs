//! Where the configuration passphrase comes from on first run.

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::Path;

use zeroize::Zeroizing;

pub trait PassphrasePrompt {
    /// Returns the passphrase that will protect `config_path`, trimmed.
    fn read_passphrase(&mut self, config_path: &Path) -> io::Result<Zeroizing<String>>;
}

/// Asks on stderr and reads one line from stdin. On a terminal echo is turned
/// off while typing; piped input is read as a plain line.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

impl PassphrasePrompt for StdinPrompt {
    fn read_passphrase(&mut self, config_path: &Path) -> io::Result<Zeroizing<String>> {
        let mut stderr = io::stderr();
        write!(
            stderr,
            "Set an encryption passphrase for configuration file {}: ",
            config_path.display()
        )?;
        stderr.flush()?;
        let stdin = io::stdin();
        if stdin.is_terminal() {
            return read_hidden(rpassword::read_password);
        }
        read_line(&mut stdin.lock())
    }
}

/// Runs an echo-free terminal read and trims the result.
fn read_hidden<F>(read: F) -> io::Result<Zeroizing<String>>
where
    F: FnOnce() -> io::Result<String>,
{
    let entered = Zeroizing::new(read()?);
    Ok(Zeroizing::new(entered.trim().to_owned()))
}

/// Reads one line and strips surrounding whitespace, including the newline.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Zeroizing<String>> {
    let mut line = Zeroizing::new(String::new());
    if reader.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before a passphrase was entered",
        ));
    }
    Ok(Zeroizing::new(line.trim().to_owned()))
}

/// Supplies a passphrase chosen ahead of time, for unattended provisioning.
#[derive(Debug)]
pub struct FixedPrompt {
    passphrase: Zeroizing<String>,
    calls: usize,
}

impl FixedPrompt {
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: Zeroizing::new(passphrase.into()),
            calls: 0,
        }
    }

    /// How many times the store asked for a passphrase.
    pub fn calls(&self) -> usize {
        self.calls
    }
}

impl PassphrasePrompt for FixedPrompt {
    fn read_passphrase(&mut self, _config_path: &Path) -> io::Result<Zeroizing<String>> {
        self.calls += 1;
        Ok(Zeroizing::new(self.passphrase.trim().to_owned()))
    }
}
