//! `%(field)s` template compilation and rendering.

use std::fmt::Write as _;

use chrono::format::{Item, StrftimeItems};

use crate::error::FormatError;
use crate::record::LogRecord;

/// Leveled, timestamped, process/thread, group, file, function, message.
pub const DEFAULT_FORMAT: &str =
    "%(levelname)s [%(asctime)s] %(process)d/%(thread)d %(folder_name)s %(filename)s %(funcName)s : %(message)s";

/// Month/day/year with a 12-hour clock, e.g. `03/07/2025 02:15:09 PM`.
pub const DEFAULT_DATE_FORMAT: &str = "%m/%d/%Y %I:%M:%S %p";

/// Widest padding a placeholder may request, e.g. `%(levelname)-8s`.
pub const MAX_FIELD_WIDTH: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    LevelName,
    LevelNo,
    AscTime,
    Process,
    Thread,
    ThreadName,
    FolderName,
    Name,
    FileName,
    PathName,
    Module,
    FuncName,
    LineNo,
    Message,
}

impl Field {
    fn parse(name: &str) -> Option<Self> {
        let field = match name {
            "levelname" => Field::LevelName,
            "levelno" => Field::LevelNo,
            "asctime" => Field::AscTime,
            "process" => Field::Process,
            "thread" => Field::Thread,
            "threadName" => Field::ThreadName,
            "folder_name" => Field::FolderName,
            "name" => Field::Name,
            "filename" => Field::FileName,
            "pathname" => Field::PathName,
            "module" => Field::Module,
            "funcName" => Field::FuncName,
            "lineno" => Field::LineNo,
            "message" => Field::Message,
            _ => return None,
        };
        Some(field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field {
        field: Field,
        width: usize,
        left_align: bool,
    },
}

/// Compiled template ready to render records.
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    date_format: String,
}

impl Formatter {
    pub fn new(template: &str, date_format: &str) -> Result<Self, FormatError> {
        let segments = parse(template)?;
        check_date_format(date_format)?;
        Ok(Self {
            segments,
            date_format: date_format.to_string(),
        })
    }

    /// Render one record as a line, without the trailing newline.
    ///
    /// An error payload is appended on the following lines.
    pub fn format(&self, record: &LogRecord) -> String {
        let mut out = String::with_capacity(128 + record.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field {
                    field,
                    width,
                    left_align,
                } => {
                    let value = self.render_field(*field, record);
                    let width = *width;
                    if *left_align {
                        let _ = write!(out, "{value:<width$}");
                    } else {
                        let _ = write!(out, "{value:>width$}");
                    }
                }
            }
        }
        if let Some(error) = &record.error {
            out.push('\n');
            out.push_str(error);
        }
        out
    }

    fn render_field(&self, field: Field, record: &LogRecord) -> String {
        match field {
            Field::LevelName => record.level.as_str().to_string(),
            Field::LevelNo => record.level.number().to_string(),
            Field::AscTime => record.timestamp.format(&self.date_format).to_string(),
            Field::Process => record.process_id.to_string(),
            Field::Thread => record.thread_id.to_string(),
            Field::ThreadName => record.thread_name.clone().unwrap_or_else(|| "-".into()),
            Field::FolderName => record.group.clone().unwrap_or_else(|| "-".into()),
            Field::Name => record.logger.clone(),
            Field::FileName => record.location.filename().to_string(),
            Field::PathName => record.location.file.to_string(),
            Field::Module => record.location.module().to_string(),
            Field::FuncName if record.location.function.is_empty() => "<unknown>".to_string(),
            Field::FuncName => record.location.function.to_string(),
            Field::LineNo => record.location.line.to_string(),
            Field::Message => record.message.clone(),
        }
    }
}

/// Check a `%(field)s` template without building a formatter.
pub fn compile_template(template: &str) -> Result<(), FormatError> {
    parse(template).map(|_| ())
}

/// Reject strftime strings chrono cannot render.
pub fn check_date_format(date_format: &str) -> Result<(), FormatError> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(FormatError::InvalidDateFormat(date_format.to_string()));
    }
    Ok(())
}

fn parse(template: &str) -> Result<Vec<Segment>, FormatError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.char_indices().peekable();

    while let Some((idx, c)) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }
        match chars.next() {
            Some((_, '%')) => literal.push('%'),
            Some((_, '(')) => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some((_, ')')) => break,
                        Some((_, ch)) => name.push(ch),
                        None => return Err(FormatError::UnterminatedPlaceholder(idx)),
                    }
                }
                let field = Field::parse(&name).ok_or(FormatError::UnknownPlaceholder(name))?;

                let left_align = chars.next_if(|&(_, ch)| ch == '-').is_some();
                let mut width = 0usize;
                while let Some((_, digit)) = chars.next_if(|&(_, ch)| ch.is_ascii_digit()) {
                    width = width
                        .checked_mul(10)
                        .and_then(|w| w.checked_add(digit.to_digit(10).unwrap_or(0) as usize))
                        .filter(|&w| w <= MAX_FIELD_WIDTH)
                        .ok_or(FormatError::WidthTooLarge {
                            index: idx,
                            max: MAX_FIELD_WIDTH,
                        })?;
                }
                match chars.next() {
                    Some((_, 's' | 'd' | 'r' | 'i')) => {}
                    Some((pos, other)) => return Err(FormatError::UnsupportedConversion(other, pos)),
                    None => return Err(FormatError::Incomplete),
                }

                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Field {
                    field,
                    width,
                    left_align,
                });
            }
            Some((pos, other)) => return Err(FormatError::UnsupportedConversion(other, pos)),
            None => return Err(FormatError::Incomplete),
        }
    }
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}
