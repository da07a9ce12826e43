//! Unix-socket [`CommandSource`] implementation.
//!
//! Binds a Unix stream socket and accepts one connection at a time.
//! Each line received is parsed as a JSON-encoded [`Command`].
//!
//! # Wire format
//!
//! Every message is a single line of JSON followed by `\n`:
//!
//! ```json
//! {"Tile":"Left"}
//! {"Shift":"Down"}
//! "ToggleMaximize"
//! {"Chord":{"key":"j","modifiers":["cmd","ctrl","alt"]}}
//! "OpenSearch"
//! {"SearchInput":"term"}
//! {"SearchRotate":"Backward"}
//! "SearchSubmit"
//! ```

use crate::command::Command;
use crate::traits::CommandSource;
use log::{debug, error, info};
use std::io::{BufRead, BufReader};
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::mpsc;

/// A [`CommandSource`] that listens on a Unix stream socket for
/// JSON-encoded commands.
///
/// Each accepted connection can send multiple newline-delimited JSON
/// commands.  When the connection closes, the listener waits for the
/// next one.
pub struct UnixSocketListener {
    path: PathBuf,
}

/// Errors produced by the Unix socket listener.
#[derive(Debug, thiserror::Error)]
pub enum UnixSocketError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

impl UnixSocketListener {
    /// Create a new listener bound to `path`.
    ///
    /// The socket file is created when [`run`](CommandSource::run) is called.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

/// Parse one wire line.  Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<Command>, UnixSocketError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

impl CommandSource for UnixSocketListener {
    type Error = UnixSocketError;

    /// Bind the socket and start accepting connections.
    ///
    /// This method **blocks** until the receiving side of `sink` is dropped.
    fn run(&mut self, sink: mpsc::Sender<Command>) -> Result<(), Self::Error> {
        // Remove stale socket if present.
        let _ = std::fs::remove_file(&self.path);

        let listener = UnixListener::bind(&self.path)?;
        info!("listening on {}", self.path.display());

        for stream in listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(e) => {
                    error!("accept error: {}", e);
                    continue;
                }
            };
            debug!("client connected");
            for line in BufReader::new(stream).lines() {
                let text = match line {
                    Ok(text) => text,
                    Err(e) => {
                        error!("read error: {}", e);
                        break;
                    }
                };
                match parse_line(&text) {
                    Ok(None) => {}
                    Ok(Some(cmd)) => {
                        debug!("received {:?}", cmd);
                        if sink.send(cmd).is_err() {
                            info!("sink closed, shutting down");
                            return Ok(());
                        }
                    }
                    Err(e) => error!("bad command {:?}: {}", text, e),
                }
            }
            debug!("client disconnected");
        }
        Ok(())
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{Direction, Rotation};
    use crate::keymap::Chord;
    use std::io::Write;
    use std::os::unix::net::UnixStream;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    /// Monotonic counter to generate unique socket paths per test.
    static TEST_ID: AtomicU32 = AtomicU32::new(0);

    fn tmp_socket_path() -> PathBuf {
        let id = TEST_ID.fetch_add(1, Ordering::SeqCst);
        std::env::temp_dir().join(format!(
            "winshift-test-{}-{}.sock",
            std::process::id(),
            id
        ))
    }

    /// Start a listener on a fresh socket and send `lines` over one
    /// connection.  Returns every command that came through.
    fn send_lines(lines: &[&str]) -> Vec<Command> {
        let path = tmp_socket_path();
        let listener_path = path.clone();
        let (tx, rx) = mpsc::channel();

        let _handle = std::thread::spawn(move || {
            let mut listener = UnixSocketListener::new(&listener_path);
            let _ = listener.run(tx);
        });

        // Give the listener a moment to bind.
        std::thread::sleep(Duration::from_millis(150));
        {
            let mut stream = UnixStream::connect(&path).expect("connect");
            for line in lines {
                writeln!(stream, "{}", line).unwrap();
            }
            stream.shutdown(std::net::Shutdown::Write).unwrap();
        }
        std::thread::sleep(Duration::from_millis(150));

        let _ = std::fs::remove_file(&path);
        rx.try_iter().collect()
    }

    #[test]
    fn commands_arrive_over_socket() {
        let cmds = send_lines(&[
            r#"{"Tile":"Right"}"#,
            r#"{"SearchInput":"term"}"#,
            r#"{"SearchRotate":"Forward"}"#,
            r#""SearchSubmit""#,
        ]);
        assert_eq!(
            cmds,
            vec![
                Command::Tile(Direction::Right),
                Command::SearchInput("term".into()),
                Command::SearchRotate(Rotation::Forward),
                Command::SearchSubmit,
            ]
        );
    }

    #[test]
    fn malformed_json_does_not_crash() {
        let cmds = send_lines(&["not json at all", "", r#"{"Shift":"left"}"#]);
        // Only the valid command should have arrived.
        assert_eq!(cmds, vec![Command::Shift(Direction::Left)]);
    }

    #[test]
    fn parse_line_reads_chords() {
        let cmd = parse_line(r#" {"Chord":{"key":"j","modifiers":["cmd","ctrl","alt"]}} "#)
            .unwrap()
            .unwrap();
        assert_eq!(cmd, Command::Chord(Chord::new("j", ["cmd", "ctrl", "alt"])));
    }

    #[test]
    fn parse_line_skips_blank_lines() {
        assert!(parse_line("   ").unwrap().is_none());
        assert!(matches!(
            parse_line("{\"Tile\":\"sideways\"}"),
            Err(UnixSocketError::Json(_))
        ));
    }
}
