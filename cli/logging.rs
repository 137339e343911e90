use anyhow::{Context, Result, anyhow};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LogSink {
    file: Option<File>,
    // Lines logged before the file is known, replayed on attach.
    pending: Vec<u8>,
}

/// Log file that can be attached after the logger is already running.
///
/// The configuration names the log file, but configuration loading itself
/// logs, so early lines are held back and written once the file is attached.
#[derive(Clone, Default)]
pub struct LogFileHandle(Arc<Mutex<LogSink>>);

impl LogFileHandle {
    pub fn attach(&self, path: &Path, overwrite: bool) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(!overwrite)
            .truncate(overwrite)
            .open(path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        let mut sink = self
            .0
            .lock()
            .map_err(|_| anyhow!("Log file lock poisoned"))?;
        file.write_all(&sink.pending)
            .with_context(|| format!("Failed to write log file {}", path.display()))?;
        sink.pending.clear();
        sink.file = Some(file);
        Ok(())
    }
}

/// Sends every log line to the log file and, unless quiet, to stderr.
struct TeeWriter {
    sink: LogFileHandle,
    quiet: bool,
}

impl Write for TeeWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.quiet {
            io::stderr().write_all(buf)?;
        }
        if let Ok(mut guard) = self.sink.0.lock() {
            let sink = &mut *guard;
            match sink.file.as_mut() {
                Some(file) => file.write_all(buf)?,
                None => sink.pending.extend_from_slice(buf),
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.quiet {
            io::stderr().flush()?;
        }
        if let Ok(mut sink) = self.sink.0.lock() {
            if let Some(file) = sink.file.as_mut() {
                file.flush()?;
            }
        }
        Ok(())
    }
}

// Quiet only silences stderr; the log file keeps the full run.
fn level_filter(verbose: u8) -> log::LevelFilter {
    match verbose {
        0 => log::LevelFilter::Info,
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

pub fn setup_logging(quiet: bool, verbose: u8) -> LogFileHandle {
    let log_level = level_filter(verbose);
    let handle = LogFileHandle::default();
    env_logger::Builder::new()
        .filter_level(log_level)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .target(env_logger::Target::Pipe(Box::new(TeeWriter {
            sink: handle.clone(),
            quiet,
        })))
        .init();
    log::trace!("Logger initialized with level: {:?}", log_level);
    handle
}
