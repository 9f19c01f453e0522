//! Novella shell entry point.

use std::error::Error;
use std::path::Path;
use std::sync::Arc;

use novella_core::clock::SystemClock;
use novella_shell::app::{App, Flow};
use novella_shell::config::ShellConfig;
use novella_shell::error::AppError;
use novella_shell::input::parse_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Stdout};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr; stdout carries view lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    tracing::info!("Starting Novella shell");

    let config = ShellConfig::from_env()?;
    let script = config.load_script()?;
    tracing::info!(
        scenes = script.len(),
        fingerprint = script.fingerprint(),
        text_speed = config.text_speed.as_millis(),
        "script loaded"
    );

    let root = config
        .script_path
        .as_deref()
        .and_then(Path::parent)
        .map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);

    let mut app = App::new(script, config.text_speed, Arc::new(SystemClock));
    run(&mut app, &root).await?;

    tracing::info!("Novella shell stopped");
    Ok(())
}

async fn run(app: &mut App, root: &Path) -> Result<(), AppError> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    emit(&mut stdout, app).await?;
    app.preload(root).await;
    emit(&mut stdout, app).await?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_line(&line) {
                    Ok(parsed) => {
                        if app.handle_line(parsed) == Flow::Quit {
                            break;
                        }
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, "input rejected");
                        let notice = serde_json::json!({ "error": e.to_string() });
                        write_line(&mut stdout, &serde_json::to_string(&notice)?).await?;
                        continue;
                    }
                }
            }
            changed = app.next_event() => {
                if !changed {
                    continue;
                }
            }
        }
        emit(&mut stdout, app).await?;
    }
    Ok(())
}

async fn emit(stdout: &mut Stdout, app: &App) -> Result<(), AppError> {
    let encoded = serde_json::to_string(&app.view())?;
    write_line(stdout, &encoded).await
}

async fn write_line(stdout: &mut Stdout, line: &str) -> Result<(), AppError> {
    stdout.write_all(line.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
