use anyhow::{Result, anyhow};
use clap::{Parser, Subcommand};
use log::{info, warn};

use rs_gmail_reader::auth::client_secret;
use rs_gmail_reader::auth::oauth::{AuthContext, AuthSettings};
use rs_gmail_reader::auth::token_store::TokenStore;
use rs_gmail_reader::config::{Config, load_config, resolve_token_path};
use rs_gmail_reader::mail::gmail::GmailClient;
use rs_gmail_reader::mail::inbox::list_unread_emails;
use rs_gmail_reader::web::{WebApp, serve};

#[derive(Parser)]
#[command(name = "rs_gmail_reader")]
#[command(about = "Read unread Gmail messages as plain text", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Log the unread messages using the stored token (default)
    Read,

    /// Run the local web server (/auth, /emails, /view-email/{id})
    Serve {
        /// Open the consent page in the browser on startup
        #[arg(long)]
        open: bool,
    },

    /// Store the OAuth client secret in keyring
    SetClientSecret {
        #[arg(long)]
        client_id: String,
    },
}

fn load() -> Result<(Config, AuthContext, GmailClient)> {
    let cfg = load_config().map_err(|e| anyhow!("Configuration error: {e}"))?;
    let store = TokenStore::new(resolve_token_path(&cfg)?);
    let auth = AuthContext::load(&AuthSettings::from_config(&cfg), store)?;
    let gmail = GmailClient::new(cfg.user_id())?;
    Ok((cfg, auth, gmail))
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.cmd.unwrap_or(Command::Read) {
        Command::SetClientSecret { client_id } => {
            eprintln!("Paste client secret (end with Ctrl-D):");
            let mut secret = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut secret)?;
            let secret = secret.trim();
            client_secret::save_client_secret(&client_id, secret)?;
            println!("Saved client secret for client_id {}", client_id);
            Ok(())
        }

        Command::Read => {
            let (cfg, mut auth, gmail) = load()?;
            let session = gmail.session(&mut auth)?;
            let emails = list_unread_emails(&session, cfg.max_results())?;
            info!("{} unread email(s)", emails.len());
            for email in &emails {
                println!("{} - {}", email.id, email.snippet);
            }
            Ok(())
        }

        Command::Serve { open: open_browser } => {
            let (cfg, auth, gmail) = load()?;
            let addr = cfg.listen_addr()?;
            let mut app = WebApp::new(auth, gmail, cfg.max_results());

            if open_browser {
                let url = app.begin_authorization();
                // best-effort: don't fail if browser can't be opened
                if let Err(e) = open::that(url.as_str()) {
                    warn!("could not open browser automatically: {e}");
                    println!("Open this URL in your browser:\n{url}");
                }
            } else {
                println!("Visit http://{addr}/auth to sign in, or /emails once authorized");
            }

            serve(&mut app, addr)
        }
    }
}
