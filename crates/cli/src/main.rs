//! Álamo CLI - publish and manage school news from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Log in (password from ALAMO_PASSWORD or prompted)
//! alamo --api-url https://colegio.example/ login -u directora
//!
//! # List posts and categories
//! alamo news list
//! alamo news categories
//!
//! # Publish a post with a cover image
//! alamo news publish --title "Inicio de clases" --content-file aviso.html --image portada.jpg
//!
//! # Delete a post without the confirmation prompt
//! alamo news delete 12 --yes
//! ```
//!
//! # Commands
//!
//! - `login` / `logout` / `status` - Manage the saved backend token
//! - `news` - List, publish and delete news posts

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "alamo")]
#[command(author, version, about = "Álamo school admin CLI")]
struct Cli {
    /// Base URL of the school backend
    #[arg(long, env = "API_URL", global = true)]
    api_url: Option<String>,

    /// File holding the backend token between invocations
    #[arg(
        long,
        env = "ALAMO_SESSION_FILE",
        default_value = ".alamo/session",
        global = true
    )]
    session_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Exchange credentials for a backend token
    Login {
        /// Admin username
        #[arg(short, long)]
        username: String,

        /// Admin password (prompted when omitted)
        #[arg(short, long, env = "ALAMO_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the saved token
    Logout,
    /// Show whether a token is saved
    Status,
    /// Manage news posts
    News {
        #[command(subcommand)]
        action: NewsAction,
    },
}

#[derive(Subcommand)]
enum NewsAction {
    /// List published posts
    List,
    /// List post categories
    Categories,
    /// Publish a new post
    Publish {
        /// Post title
        #[arg(short, long)]
        title: String,

        /// Category id (defaults to the first category)
        #[arg(short, long)]
        category: Option<i64>,

        /// Post content (HTML markup allowed)
        #[arg(long, conflicts_with = "content_file", required_unless_present = "content_file")]
        content: Option<String>,

        /// Read the post content from a file
        #[arg(long)]
        content_file: Option<PathBuf>,

        /// Cover image
        #[arg(short, long)]
        image: Option<PathBuf>,
    },
    /// Delete a post
    Delete {
        /// Post id
        id: i64,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "alamo_cli=info,alamo_admin=warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::new(cli.api_url, cli.session_file);

    match cli.command {
        Commands::Login { username, password } => {
            commands::session::login(&ctx, &username, password).await?;
        }
        Commands::Logout => commands::session::logout(&ctx).await?,
        Commands::Status => commands::session::status(&ctx).await?,
        Commands::News { action } => match action {
            NewsAction::List => commands::news::list(&ctx).await?,
            NewsAction::Categories => commands::news::categories(&ctx).await?,
            NewsAction::Publish {
                title,
                category,
                content,
                content_file,
                image,
            } => {
                let content = commands::news::read_content(content, content_file).await?;
                let post = commands::news::NewPost {
                    title,
                    content,
                    category,
                    image,
                };
                commands::news::publish(&ctx, post).await?;
            }
            NewsAction::Delete { id, yes } => commands::news::delete(&ctx, id, yes).await?,
        },
    }
    Ok(())
}
