//! Destination resolution.
//!
//! # Responsibilities
//! - Map each [`Destination`] to an open, writable [`Sink`]
//! - Open every distinct destination exactly once for the process lifetime
//! - Create and truncate file destinations at startup
//!
//! # Design Decisions
//! - File handles are shared through `Arc<File>`; `&File` implements `Write`,
//!   so concurrent requests write without a lock
//! - Writes run on the blocking pool so a slow disk or a full console pipe
//!   never stalls the runtime

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::sync::Arc;

use axum::body::Bytes;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::config::Settings;
use crate::error::TapError;
use crate::sink::destination::{ConsoleStream, Destination};
use crate::sink::guard::{check_log_collision, LogRoute};

#[derive(Debug, Clone)]
enum Target {
    Console(ConsoleStream),
    File(Arc<File>),
    Discard,
}

impl Target {
    fn write_blocking(&self, bytes: &[u8]) -> io::Result<()> {
        match self {
            Target::Console(ConsoleStream::Stdout) => {
                let mut out = io::stdout().lock();
                out.write_all(bytes)?;
                out.flush()
            }
            Target::Console(ConsoleStream::Stderr) => io::stderr().lock().write_all(bytes),
            Target::File(file) => {
                let mut file: &File = file;
                file.write_all(bytes)
            }
            Target::Discard => Ok(()),
        }
    }
}

/// An open destination.
///
/// Cloning is cheap and every clone writes to the same handle.
#[derive(Debug, Clone)]
pub struct Sink {
    destination: Option<Destination>,
    target: Target,
}

impl Sink {
    /// A sink for one of the console streams.
    pub fn console(stream: ConsoleStream) -> Self {
        Self {
            destination: Some(Destination::Console(stream)),
            target: Target::Console(stream),
        }
    }

    /// A sink that accepts and drops everything.
    pub fn discard() -> Self {
        Self {
            destination: None,
            target: Target::Discard,
        }
    }

    /// The destination this sink was opened from. `None` for a discarding sink.
    pub fn destination(&self) -> Option<&Destination> {
        self.destination.as_ref()
    }

    pub fn is_discard(&self) -> bool {
        matches!(self.target, Target::Discard)
    }

    /// Open a destination. Files are created, or truncated if they exist.
    pub fn open(destination: &Destination) -> Result<Self, TapError> {
        match destination {
            Destination::Console(stream) => Ok(Self::console(*stream)),
            Destination::File(path) => {
                let file = OpenOptions::new()
                    .write(true)
                    .create(true)
                    .truncate(true)
                    .open(path)
                    .map_err(|source| TapError::SinkOpen {
                        path: path.clone(),
                        source,
                    })?;
                Ok(Self {
                    destination: Some(destination.clone()),
                    target: Target::File(Arc::new(file)),
                })
            }
        }
    }

    /// Write all of `bytes` as one write to the underlying handle.
    pub async fn write_all(&self, bytes: Bytes) -> io::Result<()> {
        if bytes.is_empty() || self.is_discard() {
            return Ok(());
        }
        let target = self.target.clone();
        tokio::task::spawn_blocking(move || target.write_blocking(&bytes))
            .await
            .map_err(io::Error::other)?
    }

    /// Writer factory for the log subscriber.
    pub fn make_writer(&self) -> BoxMakeWriter {
        match &self.target {
            Target::Console(ConsoleStream::Stdout) => BoxMakeWriter::new(io::stdout),
            Target::Console(ConsoleStream::Stderr) => BoxMakeWriter::new(io::stderr),
            Target::File(file) => BoxMakeWriter::new(Arc::clone(file)),
            Target::Discard => BoxMakeWriter::new(io::sink),
        }
    }
}

/// Opens destinations, reusing the sink for a destination seen before.
#[derive(Debug, Default)]
pub struct SinkRegistry {
    opened: HashMap<Destination, Sink>,
}

impl SinkRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolve(&mut self, destination: &Destination) -> Result<Sink, TapError> {
        if let Some(sink) = self.opened.get(destination) {
            return Ok(sink.clone());
        }
        let sink = Sink::open(destination)?;
        self.opened.insert(destination.clone(), sink.clone());
        Ok(sink)
    }

    /// Number of distinct destinations opened so far.
    pub fn len(&self) -> usize {
        self.opened.len()
    }

    pub fn is_empty(&self) -> bool {
        self.opened.is_empty()
    }
}

/// The three output streams, resolved and guarded.
#[derive(Debug, Clone)]
pub struct SinkSet {
    pub body: Sink,
    pub headers: Option<Sink>,
    /// Either the resolved log destination or a discarding sink.
    pub log: Sink,
    pub log_route: LogRoute,
}

impl SinkSet {
    /// Resolve body, headers and log destinations, then apply the collision
    /// guard to the log sink. The decision holds for the rest of the run.
    pub fn open(settings: &Settings) -> Result<Self, TapError> {
        let mut registry = SinkRegistry::new();

        let body = registry.resolve(&settings.body)?;
        let headers = settings
            .headers
            .as_ref()
            .map(|destination| registry.resolve(destination))
            .transpose()?;
        let log = registry.resolve(&settings.log)?;

        let log_route =
            check_log_collision(&settings.body, settings.headers.as_ref(), &settings.log);
        let log = match log_route {
            LogRoute::Active => log,
            LogRoute::Silenced { .. } => Sink::discard(),
        };

        Ok(Self {
            body,
            headers,
            log,
            log_route,
        })
    }
}
