use crate::{
    app::App,
    commands::{Command, HELP},
    errors::{AppError, FileError},
    render,
    upload::{self, UploadOutcome},
};
use tracing;

/// What the driver loop should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

/// Runs one command against the app and returns the screen to print.
///
/// Errors are user mistakes or backend problems worth showing; none of them
/// end the session.
pub async fn dispatch(app: &mut App, command: Command) -> Result<Flow, AppError> {
    tracing::debug!(?command, "Dispatching command");
    let mut notice: Option<String> = None;

    match command {
        Command::Quit => return Ok(Flow::Quit),
        Command::Help => return Ok(Flow::Continue(HELP.to_string())),
        Command::Show => {}
        Command::Resize(width) => app.resize(width),
        Command::Photo(id) => app.show_photo(&id)?,
        Command::Back => app.dismiss(),
        Command::Upload => app.toggle_upload(),
        Command::Author(author) => app.form_mut()?.set_author(author),
        Command::Caption(caption) => app.form_mut()?.set_caption(caption),
        Command::File(path) => {
            let form = app.form_mut()?;
            // A rejected file leaves its message on the form.
            match upload::load_image_file(&path).await {
                Ok(file) => {
                    let _ = form.select_file(file);
                }
                Err(FileError::Rejected(e)) => form.reject_file(&e),
                Err(FileError::Io(e)) => return Err(e.into()),
            }
        }
        Command::ClearFile => app.form_mut()?.clear_file(),
        Command::Submit => match app.submit_upload().await? {
            UploadOutcome::Uploaded => notice = Some("Photo uploaded!".to_string()),
            UploadOutcome::Busy => notice = Some("Upload already in progress".to_string()),
            UploadOutcome::Invalid(_) | UploadOutcome::Failed => {}
        },
        Command::Letter => app.toggle_letter().await,
        Command::Open => app.open_letter()?,
        Command::Next => {
            app.next_speech().await?;
        }
        Command::Close => {
            let report = app.close_letter().await?;
            if !report.failed.is_empty() {
                notice = Some(format!(
                    "{} message(s) could not be removed; type 'retry' to try again",
                    report.failed.len()
                ));
            }
        }
        Command::Retry => {
            let report = app.retry_deletions().await;
            notice = Some(format!(
                "Removed {} message(s), {} still pending",
                report.deleted.len(),
                report.failed.len()
            ));
        }
    }

    let screen = render::render_app(app);
    Ok(Flow::Continue(match notice {
        Some(notice) => format!("{}\n\n{}", notice, screen),
        None => screen,
    }))
}
