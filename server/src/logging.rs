//! Log subscriber setup and the background log file writer.
//!
//! Console output goes through the usual `fmt` layer. File output is handed to
//! a bounded queue drained by a dedicated thread, so slow disks never stall a
//! tick for longer than it takes to fill the queue. When the queue is full,
//! callers block until the writer catches up; no line is dropped.

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

enum Message {
    Line(Vec<u8>),
    Shutdown,
}

/// Sending half of the log file queue.
///
/// Implements [`MakeWriter`], so it can be passed straight to a `fmt` layer.
#[derive(Clone)]
pub struct LogQueue {
    sender: Sender<Message>,
}

/// Keeps the log writer thread alive.
///
/// Dropping the guard drains every queued line to disk and joins the thread.
pub struct LogGuard {
    sender: Sender<Message>,
    handle: Option<JoinHandle<io::Result<()>>>,
}

impl LogQueue {
    /// Opens `path` for appending and starts the writer thread.
    pub fn open(path: &Path, capacity: usize) -> ServerResult<(Self, LogGuard)> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| ServerError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;

        let (sender, receiver) = crossbeam_channel::bounded(capacity);
        let handle = thread::Builder::new()
            .name("quarry-log".to_owned())
            .spawn(move || drain(&receiver, file))
            .map_err(|source| ServerError::LogFile {
                path: path.to_path_buf(),
                source,
            })?;

        let guard = LogGuard {
            sender: sender.clone(),
            handle: Some(handle),
        };
        Ok((Self { sender }, guard))
    }
}

fn drain(receiver: &Receiver<Message>, file: File) -> io::Result<()> {
    let mut out = BufWriter::new(file);
    for message in receiver {
        match message {
            Message::Line(line) => {
                out.write_all(&line)?;
                if receiver.is_empty() {
                    out.flush()?;
                }
            }
            Message::Shutdown => break,
        }
    }
    out.flush()
}

impl LogGuard {
    /// Drains the queue, stops the writer and reports any write failure.
    pub fn finish(mut self) -> io::Result<()> {
        self.stop()
    }

    fn stop(&mut self) -> io::Result<()> {
        let Some(handle) = self.handle.take() else {
            return Ok(());
        };
        // A send error means the writer already exited; its result is in the handle.
        let _ = self.sender.send(Message::Shutdown);
        handle
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "log writer panicked"))?
    }
}

impl Drop for LogGuard {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Writer handed out per event by [`LogQueue`].
pub struct QueueWriter<'a> {
    sender: &'a Sender<Message>,
}

impl Write for QueueWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.sender
            .send(Message::Line(buf.to_vec()))
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "log writer stopped"))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogQueue {
    type Writer = QueueWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        QueueWriter {
            sender: &self.sender,
        }
    }
}

fn env_filter(debug_mode: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if debug_mode { "debug" } else { "info" })
    })
}

/// Installs the global subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level follows `debug_mode`.
/// Returns the file writer guard when `log_file` is set; keep it alive for
/// as long as the server runs.
pub fn init(config: &ServerConfig) -> ServerResult<Option<LogGuard>> {
    let (file_layer, guard) = match &config.log_file {
        Some(path) => {
            let (queue, guard) = LogQueue::open(path, config.log_queue_capacity)?;
            let layer = tracing_subscriber::fmt::layer()
                .with_ansi(false)
                .with_writer(queue);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter(config.debug_mode))
        .with(tracing_subscriber::fmt::layer())
        .with(file_layer)
        .try_init()
        .map_err(|err| ServerError::LogInit(err.to_string()))?;

    Ok(guard)
}
