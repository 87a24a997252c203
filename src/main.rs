//! Scrappey CLI
//!
//! A command-line tool for sending requests through the Scrappey web
//! scraping API: one-shot GET/POST fetches, session management, and
//! antibot bypass flags.

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use scrappey::{RequestOptions, ScrappeyClient, ScrappeyResponse, SessionOptions};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "scrappey")]
#[command(about = "Fetch pages through the Scrappey web scraping API")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// API key (get one at https://scrappey.com)
    #[arg(long, global = true, env = "SCRAPPEY_API_KEY", default_value = "YOUR_API_KEY_HERE")]
    api_key: String,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a URL with a GET request
    Get {
        /// URL to fetch
        url: String,

        /// Reuse an existing session
        #[arg(short, long)]
        session: Option<String>,

        /// Request Cloudflare bot-protection bypass
        #[arg(long)]
        cloudflare_bypass: bool,

        /// Use the premium proxy pool
        #[arg(long)]
        premium_proxy: bool,

        /// Print the full response as JSON fields instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Send a POST request
    Post {
        /// URL to post to
        url: String,

        /// Body payload (form string or JSON)
        #[arg(short, long)]
        data: String,

        /// Reuse an existing session
        #[arg(short, long)]
        session: Option<String>,

        /// Print the full response as JSON fields instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Create a browser session and print its identifier
    SessionCreate {
        /// Custom session identifier
        #[arg(short, long)]
        session: Option<String>,

        /// Proxy string (http://user:pass@ip:port)
        #[arg(short, long)]
        proxy: Option<String>,
    },

    /// Destroy a browser session
    SessionDestroy {
        /// Session identifier to destroy
        session: String,
    },

    /// Check whether a session is still alive
    SessionActive {
        /// Session identifier to check
        session: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let client = ScrappeyClient::new(cli.api_key)?;

    match cli.command {
        Commands::Get {
            url,
            session,
            cloudflare_bypass,
            premium_proxy,
            json,
        } => {
            let mut options = RequestOptions::new();
            if let Some(session) = session {
                options = options.session(session);
            }
            if cloudflare_bypass {
                options = options.cloudflare_bypass(true);
            }
            if premium_proxy {
                options = options.premium_proxy(true);
            }

            let response = client.get(&url, &options).await?;
            print_response(&response, json);
        }

        Commands::Post {
            url,
            data,
            session,
            json,
        } => {
            let mut options = RequestOptions::new();
            if let Some(session) = session {
                options = options.session(session);
            }

            let response = client.post(&url, data, &options).await?;
            print_response(&response, json);
        }

        Commands::SessionCreate { session, proxy } => {
            let mut options = SessionOptions::new();
            if let Some(session) = session {
                options = options.session(session);
            }
            if let Some(proxy) = proxy {
                options = options.proxy(proxy);
            }

            let response = client.create_session(&options).await?;
            if let Some(error) = response.error() {
                println!("{} {}", "error:".red().bold(), error);
                std::process::exit(1);
            }
            println!("{} {}", "session:".green().bold(), response.session);
        }

        Commands::SessionDestroy { session } => {
            let response = client.destroy_session(&session).await?;
            if let Some(error) = response.error() {
                println!("{} {}", "error:".red().bold(), error);
                std::process::exit(1);
            }
            println!("{}", "session destroyed".green());
        }

        Commands::SessionActive { session } => {
            let active = client.is_session_active(&session).await?;
            if let Some(error) = active.error() {
                println!("{} {}", "error:".red().bold(), error);
                std::process::exit(1);
            }
            if active.active {
                println!("{}", "active".green());
            } else {
                println!("{}", "inactive".yellow());
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn print_response(response: &ScrappeyResponse, json: bool) {
    if let Some(error) = response.error() {
        println!("{} {}", "error:".red().bold(), error);
        std::process::exit(1);
    }

    if json {
        match serde_json::to_string_pretty(response) {
            Ok(body) => println!("{}", body),
            Err(e) => eprintln!("failed to render response: {}", e),
        }
        return;
    }

    println!("{} {}", "status:".bold(), response.data);
    println!("{} {}", "status code:".bold(), response.solution.status_code);
    println!("{} {}", "verified:".bold(), response.solution.verified);
    if !response.session.is_empty() {
        println!("{} {}", "session:".bold(), response.session);
    }
    if !response.solution.current_url.is_empty() {
        println!("{} {}", "url:".bold(), response.solution.current_url);
    }
    println!("{} {}ms", "elapsed:".bold(), response.time_elapsed);

    let body = if response.solution.inner_text.is_empty() {
        &response.solution.response
    } else {
        &response.solution.inner_text
    };
    if !body.is_empty() {
        println!("\n{}", truncate(body, 500));
    }
}

/// Clip a body preview at a char boundary.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let clipped: String = s.chars().take(max_len).collect();
        format!("{}...", clipped)
    }
}

#[cfg(test)]
mod tests {
    use super::truncate;

    #[test]
    fn test_truncate_short_string_unchanged() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_clips_long_string() {
        assert_eq!(truncate("hello world", 5), "hello...");
    }
}
