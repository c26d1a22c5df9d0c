use crate::{errors::AppError, models::PhotoId};
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  show                 redraw the wall
  resize <width>       set the viewport width in pixels
  photo <id>           enlarge a photo
  back                 close the open overlay
  upload               open or close the upload form
  author <name>        set the author field
  caption <text>       set the caption field
  file <path>          pick an image from disk
  clear-file           remove the picked image
  submit               upload the photo
  letter               show or hide the letter
  open                 open the envelope
  next                 flip to the next speech
  close                close the letter (read speeches are deleted)
  retry                retry deletions that failed
  help                 show this text
  quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Show,
    Resize(u32),
    Photo(PhotoId),
    Back,
    Upload,
    Author(String),
    Caption(String),
    File(PathBuf),
    ClearFile,
    Submit,
    Letter,
    Open,
    Next,
    Close,
    Retry,
    Quit,
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, AppError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "help" | "?" => Command::Help,
        "show" => Command::Show,
        "resize" => {
            let width = rest
                .parse::<u32>()
                .map_err(|e| AppError::InvalidInput(format!("resize expects a width in pixels: {}", e)))?;
            Command::Resize(width)
        }
        "photo" => Command::Photo(PhotoId::from(required(rest, "photo <id>")?)),
        "back" => Command::Back,
        "upload" => Command::Upload,
        "author" => Command::Author(rest.to_string()),
        "caption" => Command::Caption(rest.to_string()),
        "file" => Command::File(PathBuf::from(required(rest, "file <path>")?)),
        "clear-file" => Command::ClearFile,
        "submit" => Command::Submit,
        "letter" => Command::Letter,
        "open" => Command::Open,
        "next" => Command::Next,
        "close" => Command::Close,
        "retry" => Command::Retry,
        "quit" | "exit" => Command::Quit,
        other => return Err(AppError::InvalidInput(format!("Unknown command '{}'; try 'help'", other))),
    };
    Ok(Some(command))
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str, AppError> {
    if value.is_empty() {
        Err(AppError::InvalidInput(format!("Usage: {}", usage)))
    } else {
        Ok(value)
    }
}
