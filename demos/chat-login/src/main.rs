use std::process::ExitCode;

use clap::{Parser, Subcommand};
use parley::prelude::*;
use parley::OnlineUsers;
use serde_json::{Map, Value, json};

#[derive(Parser)]
#[command(name = "chat-login", about = "Sign in to a Parley backend and see who is online")]
struct Cli {
    /// Backend base URL (overrides PARLEY_BACKEND_URL)
    #[arg(long, global = true)]
    backend: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Restore the saved session and print it
    Status,
    /// Sign in (or sign up) and save the session token
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Create the account instead of signing in
        #[arg(long)]
        signup: bool,
        #[arg(long)]
        full_name: Option<String>,
    },
    /// Update profile fields of the signed-in user
    Profile {
        #[arg(value_name = "KEY=VALUE", required = true, value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },
    /// Print the online roster whenever it changes, until Ctrl-C
    Watch,
    /// Sign out and forget the saved token
    Logout,
}

/// `bio=hello` → `("bio", "hello")`; values that parse as JSON keep
/// their type (`age=30` → number).
fn parse_field(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.to_string(), value))
}

#[tokio::main]
async fn main() -> ExitCode {
    parley::telemetry::init_tracing();
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), ParleyError> {
    let mut builder = ClientBuilder::from_config(ClientConfig::from_env()?);
    if let Some(url) = &cli.backend {
        builder = builder.backend_url(url);
    }
    let (mut client, mut notes) = builder.build()?;

    client.restore_session().await;

    match cli.command {
        Command::Status => print_state(&client),
        Command::Login {
            email,
            password,
            signup,
            full_name,
        } => {
            let mut credentials = json!({"email": email, "password": password});
            if let Some(name) = full_name {
                credentials["fullName"] = Value::String(name);
            }
            let mode = if signup { AuthMode::Signup } else { AuthMode::Login };

            let result = client.login(mode, &credentials).await;
            print_notifications(&mut notes);
            if let Err(e) = result {
                client.shutdown().await;
                return Err(e.into());
            }
            print_state(&client);
        }
        Command::Profile { fields } => {
            if client.user().is_none() {
                eprintln!("not signed in; run `chat-login login` first");
            } else {
                let fields: Map<String, Value> = fields.into_iter().collect();
                if let Some(user) = client.update_profile(&fields).await {
                    println!("profile: {}", Value::Object(user.profile.clone()));
                }
            }
        }
        Command::Watch => {
            print_notifications(&mut notes);
            if !client.is_connected() {
                eprintln!("no presence connection; sign in first");
            } else {
                let mut roster = client.watch_online_users();
                print_roster(&roster.borrow_and_update());
                loop {
                    tokio::select! {
                        changed = roster.changed() => {
                            if changed.is_err() {
                                break;
                            }
                            print_roster(&roster.borrow_and_update());
                        }
                        _ = tokio::signal::ctrl_c() => break,
                    }
                }
            }
        }
        Command::Logout => client.logout().await,
    }

    print_notifications(&mut notes);
    client.shutdown().await;
    Ok(())
}

fn print_state(client: &Client) {
    match client.state() {
        SessionState::Anonymous => println!("signed out"),
        SessionState::Authenticated { user_id, connected } => {
            println!("signed in as {user_id} (presence {})", if connected { "live" } else { "down" });
        }
    }
}

fn print_roster(roster: &OnlineUsers) {
    let mut ids: Vec<&str> = roster.iter().map(UserId::as_str).collect();
    ids.sort_unstable();
    println!("online ({}): {}", ids.len(), ids.join(", "));
}

fn print_notifications(notes: &mut NotificationReceiver) {
    while let Ok(note) = notes.try_recv() {
        match note.level {
            Level::Success => println!("✓ {}", note.message),
            Level::Error => eprintln!("✗ {}", note.message),
        }
    }
}
