use std::{
    fs::File,
    io::{LineWriter, Write},
    path::{Path, PathBuf},
    sync::Mutex,
};

use chrono::{DateTime, Local};
use eyre::Context;

use super::{time_format::TimeFormat, LogFormatter, LogSink, Record};
use crate::config::SinkKind;

const DATE_PLACEHOLDER: &str = "%DATE%";

pub type ConsoleWriter = Box<dyn Write + Send>;

pub struct ConsoleSink {
    writer: Mutex<ConsoleWriter>,
    formatter: Box<dyn LogFormatter>,
}

impl ConsoleSink {
    pub fn new(writer: ConsoleWriter, formatter: Box<dyn LogFormatter>) -> Self {
        Self {
            writer: Mutex::new(writer),
            formatter,
        }
    }

    pub fn stdout(formatter: Box<dyn LogFormatter>) -> Self {
        Self::new(Box::new(std::io::stdout()), formatter)
    }
}

impl LogSink for ConsoleSink {
    fn write_log(&self, record: &Record) -> eyre::Result<()> {
        let mut writer = self.writer.lock().map_err(|e| eyre::eyre!(e.to_string()))?;

        writeln!(writer, "{}", self.formatter.format(record))?;
        writer.flush().context("Can't flush console")
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }

    fn kind(&self) -> SinkKind {
        SinkKind::Console
    }
}

struct OpenFile {
    period: String,
    path: PathBuf,
    file: LineWriter<File>,
}

/// Appends to one file per date period, e.g. `logs/test_info.log.2024-03-07`.
pub struct RotatingFileSink {
    directory: PathBuf,
    filename: String,
    date_format: TimeFormat,
    formatter: Box<dyn LogFormatter>,
    current: Mutex<OpenFile>,
}

impl RotatingFileSink {
    pub fn new(
        directory: impl Into<PathBuf>,
        filename: impl Into<String>,
        date_pattern: &str,
        formatter: Box<dyn LogFormatter>,
    ) -> eyre::Result<Self> {
        let directory = directory.into();
        let filename = filename.into();
        let date_format = TimeFormat::new(date_pattern);

        let period = date_format.format(&Local::now());
        let current = open_period(&directory, &filename, period)?;

        Ok(Self {
            directory,
            filename,
            date_format,
            formatter,
            current: Mutex::new(current),
        })
    }

    /// Path of the file currently written to.
    pub fn current_path(&self) -> eyre::Result<PathBuf> {
        let current = self.current.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        Ok(current.path.clone())
    }

    pub fn path_for(&self, time: &DateTime<Local>) -> PathBuf {
        self.directory
            .join(file_name_for(&self.filename, &self.date_format.format(time)))
    }

    fn rotate_if_period_changed(&self, current: &mut OpenFile, time: &DateTime<Local>) -> eyre::Result<()> {
        let period = self.date_format.format(time);
        if period == current.period {
            return Ok(());
        }

        current.file.flush().context("Can't flush file before rotating")?;
        *current = open_period(&self.directory, &self.filename, period)?;
        Ok(())
    }
}

fn file_name_for(template: &str, period: &str) -> String {
    if template.contains(DATE_PLACEHOLDER) {
        template.replace(DATE_PLACEHOLDER, period)
    } else {
        format!("{}.{}", template, period)
    }
}

fn open_period(directory: &Path, template: &str, period: String) -> eyre::Result<OpenFile> {
    let path = directory.join(file_name_for(template, &period));
    // The period or the template may name subdirectories of `directory`.
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed creating log directory {}", parent.display()))?;
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("Failed opening or creating log file {}", path.display()))?;

    Ok(OpenFile {
        period,
        path,
        file: LineWriter::new(file),
    })
}

impl LogSink for RotatingFileSink {
    fn write_log(&self, record: &Record) -> eyre::Result<()> {
        let mut current = self.current.lock().map_err(|e| eyre::eyre!(e.to_string()))?;
        self.rotate_if_period_changed(&mut current, &record.time)?;

        writeln!(current.file, "{}", self.formatter.format(record))?;
        current.file.flush().context("Can't flush file")
    }

    fn flush(&self) {
        if let Ok(mut current) = self.current.lock() {
            let _ = current.file.flush();
        }
    }

    fn kind(&self) -> SinkKind {
        SinkKind::File
    }
}
