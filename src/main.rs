use photo_wall::{
    commands::{self, HELP},
    config::Config,
    errors::AppError,
    handlers::{self, Flow},
    render,
    startup,
};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    startup::init_tracing();
    let config = Config::load()?;

    let mut app = startup::build_app(&config).await?;

    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n\n{}\n> ", render::render_app(&app), HELP).as_bytes())
        .await?;
    stdout.flush().await?;

    while let Some(line) = lines.next_line().await? {
        let output = match commands::parse(&line) {
            Ok(None) => String::new(),
            Ok(Some(command)) => match handlers::dispatch(&mut app, command).await {
                Ok(Flow::Continue(screen)) => screen,
                Ok(Flow::Quit) => break,
                Err(e) => {
                    tracing::warn!(error = %e, "Command failed");
                    format!("! {}", e)
                }
            },
            Err(e) => format!("! {}", e),
        };

        if !output.is_empty() {
            stdout.write_all(output.as_bytes()).await?;
            stdout.write_all(b"\n").await?;
        }
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
    }

    tracing::info!("Bye");
    Ok(())
}
