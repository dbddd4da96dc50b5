//! JSON line protocol for engines that live outside the process
//!
//! One request object per line in, one response object per line out:
//!
//! ```text
//! > {"snake":[{"x":0,"y":0}],"fruit":{"x":5,"y":5},"grid_size":20,"direction":"right"}
//! < {"failed":false,"got_fruit":false,"snake":[{"x":0,"y":1}],"fruit":{"x":5,"y":5}}
//! ```
//!
//! A server that cannot handle a request answers `{"error":"..."}`.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{AdvanceRequest, AdvanceResponse, Engine, EngineError};

#[derive(Debug, Serialize, Deserialize)]
struct ErrorReply {
    error: String,
}

pub fn encode_request(request: &AdvanceRequest) -> Result<String, EngineError> {
    serde_json::to_string(request).map_err(|e| EngineError::InvalidRequest(e.to_string()))
}

pub fn decode_response(line: &str) -> Result<AdvanceResponse, EngineError> {
    if let Ok(reply) = serde_json::from_str::<ErrorReply>(line) {
        return Err(EngineError::Remote(reply.error));
    }
    serde_json::from_str(line).map_err(|e| EngineError::Malformed(e.to_string()))
}

/// Carries one encoded request to an engine and brings back its reply line
pub trait Transport {
    fn exchange(&mut self, line: &str) -> Result<String, EngineError>;
}

impl<F> Transport for F
where
    F: FnMut(&str) -> Result<String, EngineError>,
{
    fn exchange(&mut self, line: &str) -> Result<String, EngineError> {
        self(line)
    }
}

/// Engine reached through a line transport
pub struct JsonEngine<T> {
    transport: T,
}

impl<T: Transport> JsonEngine<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }
}

impl<T: Transport> Engine for JsonEngine<T> {
    fn advance(&mut self, request: &AdvanceRequest) -> Result<AdvanceResponse, EngineError> {
        let line = encode_request(request)?;
        let reply = self.transport.exchange(&line)?;
        decode_response(reply.trim_end())
    }
}

/// How long a child engine gets to answer one request
pub const DEFAULT_REPLY_TIMEOUT: Duration = Duration::from_secs(1);

/// Child process speaking the line protocol on stdin/stdout
pub struct ProcessTransport {
    child: Child,
    stdin: ChildStdin,
    replies: Receiver<io::Result<String>>,
    timeout: Duration,
}

impl ProcessTransport {
    /// Spawn `program` with `args`. The child's stderr is discarded so it
    /// cannot scribble over the terminal UI.
    pub fn spawn(program: &str, args: &[String]) -> Result<Self, EngineError> {
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| EngineError::Transport("child stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Transport("child stdout unavailable".into()))?;

        let (tx, replies) = mpsc::channel();
        let reader = thread::Builder::new()
            .name("engine-reader".into())
            .spawn(move || read_replies(BufReader::new(stdout), tx));
        if let Err(e) = reader {
            let _ = child.kill();
            let _ = child.wait();
            return Err(e.into());
        }

        debug!(program, "spawned engine process");
        Ok(Self {
            child,
            stdin,
            replies,
            timeout: DEFAULT_REPLY_TIMEOUT,
        })
    }

    /// Spawn from a whitespace-separated command line
    pub fn from_command_line(command: &str) -> Result<Self, EngineError> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| EngineError::Transport("empty engine command".into()))?;
        let args: Vec<String> = parts.collect();
        Self::spawn(&program, &args)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Forward every line the child prints until it closes stdout or the
/// transport is dropped
fn read_replies<R: BufRead>(mut reader: R, tx: mpsc::Sender<io::Result<String>>) {
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
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
    }
}

impl Transport for ProcessTransport {
    fn exchange(&mut self, line: &str) -> Result<String, EngineError> {
        // Late answers to a request that already timed out
        while let Ok(stale) = self.replies.try_recv() {
            warn!(?stale, "discarding late engine reply");
        }

        writeln!(self.stdin, "{line}")?;
        self.stdin.flush()?;

        match self.replies.recv_timeout(self.timeout) {
            Ok(reply) => Ok(reply?),
            Err(RecvTimeoutError::Timeout) => Err(EngineError::Transport(format!(
                "engine process did not answer within {:?}",
                self.timeout
            ))),
            Err(RecvTimeoutError::Disconnected) => {
                Err(EngineError::Transport("engine process closed its output".into()))
            }
        }
    }
}

impl Drop for ProcessTransport {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Answer line-protocol requests from `reader` until EOF.
///
/// Returns the number of requests answered, including error replies.
pub fn serve_lines<E, R, W>(engine: &mut E, reader: R, mut writer: W) -> std::io::Result<usize>
where
    E: Engine + ?Sized,
    R: BufRead,
    W: Write,
{
    let mut served = 0;

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let outcome = serde_json::from_str::<AdvanceRequest>(&line)
            .map_err(|e| EngineError::InvalidRequest(e.to_string()))
            .and_then(|request| engine.advance(&request));

        let reply = match outcome {
            Ok(response) => serde_json::to_string(&response),
            Err(err) => {
                warn!(error = %err, "rejecting engine request");
                serde_json::to_string(&ErrorReply {
                    error: err.to_string(),
                })
            }
        }
        .map_err(std::io::Error::other)?;

        writeln!(writer, "{reply}")?;
        writer.flush()?;
        served += 1;
    }

    Ok(served)
}
