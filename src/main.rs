use openwall_client::cli::{Command, HELP};
use openwall_client::{Config, ContentService, OpenwallApi, ResponseCache};
use serde_json::Value;
use std::error::Error;
use std::io::{self, Write};
use std::sync::Arc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::from_env()?;
    info!("Starting Openwall client against {}", config.api_url);

    let cache: Arc<ResponseCache<Value>> = Arc::new(ResponseCache::new());
    let sweeper = config
        .sweep_interval
        .map(|interval| cache.spawn_sweeper(interval));

    let api = OpenwallApi::new(&config, cache)?;
    let service = ContentService::new(api);

    println!("=== The Openwall ===");
    println!("{}", HELP);

    let mut input = String::new();
    loop {
        input.clear();
        print!("> ");
        io::stdout().flush()?;
        if io::stdin().read_line(&mut input)? == 0 {
            debug!("Reached end of input");
            break;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let result = match command {
            Command::Exit => {
                debug!("Received exit command");
                break;
            }
            Command::Empty => Ok(()),
            Command::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Command::Articles { page } => service.show_articles(page).await,
            Command::Article { slug } => service.show_article(&slug).await,
            Command::Videos => service.show_videos().await,
            Command::Dictionary { term } => service.show_dictionary(&term).await,
            Command::Saved => service.show_saved().await,
            Command::ToggleSaved { slug } => service.toggle_saved(&slug).await,
            Command::Refresh => {
                service.refresh();
                Ok(())
            }
            Command::Logout => {
                service.logout();
                Ok(())
            }
        };

        if let Err(e) = result {
            error!("Command failed: {}", e);
            println!("Hata: {}", e);
        }
    }

    if let Some(sweeper) = sweeper {
        sweeper.abort();
    }
    info!("Shutting down");
    Ok(())
}
