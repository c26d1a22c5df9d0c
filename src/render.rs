//! Plain-text rendering of the wall for the terminal front end.

use crate::{
    app::{App, UiMode},
    embed,
    gallery::{Display, GridView, PhotoCard},
    letter::LetterView,
    upload::{UploadForm, UploadPhase},
};

pub const EMPTY_WALL: &str = "No photos yet. Be the first to add one!";
pub const ALREADY_READ: &str = "Congratulations! \u{1F389}\u{1F389}\u{1F389}";

pub fn render_app(app: &App) -> String {
    let mut lines = vec![format!("== {} ==", app.title())];
    if !app.subtitle().is_empty() {
        lines.push(app.subtitle().to_string());
    }
    lines.push(String::new());
    lines.push(render_grid(&app.gallery().view()));

    match app.mode() {
        UiMode::None => {}
        UiMode::UploadOpen => {
            lines.push(String::new());
            lines.push(render_form(app.form()));
        }
        UiMode::LetterOpen => {
            lines.push(String::new());
            lines.push(render_letter(&app.letter().view()));
        }
        UiMode::PhotoDetail(_) => {
            if let Some(card) = app.selected_photo() {
                lines.push(String::new());
                lines.push(render_photo(&card));
            }
        }
    }
    lines.join("\n")
}

pub fn render_grid(view: &GridView) -> String {
    match view {
        GridView::Loading => "Loading photos...".to_string(),
        GridView::Empty => EMPTY_WALL.to_string(),
        GridView::Rows(rows) => rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(card_summary)
                    .collect::<Vec<_>>()
                    .join(" | ")
            })
            .collect::<Vec<_>>()
            .join("\n"),
    }
}

fn card_summary(card: &PhotoCard) -> String {
    let label = card.caption.as_deref().unwrap_or("untitled");
    let marker = match card.display {
        Display::Image { .. } => "",
        Display::Embed(_) => " [instagram]",
    };
    format!("[{}] {}{} ({:+.2}°)", card.id, label, marker, card.rotation)
}

pub fn render_photo(card: &PhotoCard) -> String {
    let mut lines = vec![format!("-- Photo {} --", card.id)];
    match &card.display {
        Display::Image { url, .. } => lines.push(url.clone()),
        Display::Embed(reference) => {
            lines.push(reference.permalink());
            lines.push(embed::render_html(reference, card.caption.as_deref()));
            lines.push(format!(
                r#"<script async src="{}"></script>"#,
                embed::INSTAGRAM_EMBED_SCRIPT
            ));
        }
    }
    if let Some(caption) = &card.caption {
        lines.push(caption.clone());
    }
    if let Some(author) = &card.author {
        lines.push(format!("by: {}", author));
    }
    lines.push("(type 'back' to close)".to_string());
    lines.join("\n")
}

pub fn render_form(form: &UploadForm) -> String {
    let mut lines = vec![
        "-- Add a photo --".to_string(),
        format!("Name:    {}", form.author()),
        format!("Caption: {}  ({})", form.caption(), form.caption_counter()),
    ];
    match form.file() {
        Some(file) => lines.push(format!(
            "File:    {} ({:.1} KB)",
            file.file_name,
            file.size() as f64 / 1024.0
        )),
        None => lines.push("File:    none (PNG, JPG, GIF, max. 5MB)".to_string()),
    }
    if let Some(error) = form.error() {
        lines.push(format!("! {}", error));
    }
    lines.push(
        match form.phase() {
            UploadPhase::Idle => "[ Upload ]",
            UploadPhase::Validating | UploadPhase::Submitting => "[ Uploading... ]",
            UploadPhase::Success => "Photo uploaded!",
        }
        .to_string(),
    );
    lines.join("\n")
}

pub fn render_letter(view: &LetterView) -> String {
    match view {
        LetterView::Loading => "Loading letter...".to_string(),
        LetterView::AlreadyRead => ALREADY_READ.to_string(),
        LetterView::Envelope { unread } => format!(
            "[ envelope: {} message(s) ]\nType 'open' to open it (you only get to read it once!)",
            unread
        ),
        LetterView::Page(page) if page.flipped => "(turning the page...)".to_string(),
        LetterView::Page(page) => {
            let mut lines = vec![format!("~ {} ~", page.header)];
            lines.extend(page.paragraphs.iter().cloned());
            lines.push(format!("  - {}", page.from));
            lines.push(format!("Message {} of {}", page.position, page.total));
            lines.push(if page.can_advance {
                "[ next ]  [ close ]".to_string()
            } else {
                "[ close ]".to_string()
            });
            lines.join("\n")
        }
    }
}
