use std::io::Write;
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time;
use tracing_subscriber::EnvFilter;

use localtime_client::config::load_config;
use localtime_client::core::error::AppError;
use localtime_client::features::clock::TICK_INTERVAL;
use localtime_client::features::localtime::LocalTimeClient;
use localtime_client::features::screen::LocalTimeScreen;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let config = load_config()?;
    let api = Arc::new(LocalTimeClient::new(&config)?);
    tracing::info!(endpoint = %api.endpoint(), "localtime client ready");

    let (screen, mut notices) = LocalTimeScreen::new(api);
    screen.spawn_clock();

    println!("commands: send, fetch, list, quit");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut render = time::interval(TICK_INTERVAL);

    loop {
        tokio::select! {
            _ = render.tick() => {
                let state = screen.snapshot();
                print!("\r{}  {:<60}", state.clock, state.status);
                let _ = std::io::stdout().flush();
            }
            notice = notices.recv() => {
                if let Some(message) = notice {
                    println!("\n{message}");
                }
            }
            line = lines.next_line() => {
                let Ok(Some(line)) = line else { break };
                match line.trim() {
                    "send" | "s" => screen.spawn_send(),
                    "fetch" | "f" => screen.spawn_fetch(),
                    "list" | "l" => print_times(&screen),
                    "quit" | "q" => break,
                    "" => {}
                    other => println!("unknown command: {other}"),
                }
            }
        }
    }

    screen.teardown();
    println!();
    Ok(())
}

fn print_times(screen: &LocalTimeScreen) {
    let state = screen.snapshot();
    println!();
    if state.times.is_empty() {
        println!("no times fetched yet");
        return;
    }
    for entry in &state.times {
        println!("{:>6}  {}", entry.id, entry.local_time);
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
