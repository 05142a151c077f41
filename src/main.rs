use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use seat_booking::{
    config::{Config, LogFormat},
    controllers::{Notice, UiEvent},
    services::AuthTab,
    ReservationClient,
};

const HELP: &str = "\
commands:
  seats                 show the seat map
  select N | N          toggle seat N
  count N               set the number of seats to book
  book                  book `count` seats
  reset                 clear the selection and release prior bookings
  refresh               reload seats from the service
  login | signup        open the auth form on that tab
  email X | password X  fill in the auth form
  submit | cancel       submit or close the auth form
  logout                sign out
  quit";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Event(UiEvent),
    ShowMap,
    Help,
    Quit,
    Unknown(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };

    match head.to_ascii_lowercase().as_str() {
        "" | "seats" | "map" => Command::ShowMap,
        "select" | "seat" => match rest.parse() {
            Ok(n) => Command::Event(UiEvent::SeatClicked(n)),
            Err(_) => Command::Unknown(line.to_string()),
        },
        "count" => Command::Event(UiEvent::CountChanged(rest.to_string())),
        "book" => Command::Event(UiEvent::BookPressed),
        "reset" => Command::Event(UiEvent::ResetPressed),
        "refresh" => Command::Event(UiEvent::RefreshRequested),
        "login" => Command::Event(UiEvent::SwitchAuthTab(AuthTab::Login)),
        "signup" => Command::Event(UiEvent::SwitchAuthTab(AuthTab::Signup)),
        "email" => Command::Event(UiEvent::EmailChanged(rest.to_string())),
        "password" => Command::Event(UiEvent::PasswordChanged(rest.to_string())),
        "submit" => Command::Event(UiEvent::SubmitAuth),
        "cancel" => Command::Event(UiEvent::CloseAuth),
        "logout" => Command::Event(UiEvent::LogoutPressed),
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => match other.parse() {
            Ok(n) => Command::Event(UiEvent::SeatClicked(n)),
            Err(_) => Command::Unknown(line.to_string()),
        },
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    // Логи в stderr, чтобы не мешать схеме зала в stdout
    let registry = tracing_subscriber::registry().with(EnvFilter::new(&config.app.rust_log));
    match config.app.log_format {
        LogFormat::Json => registry.with(fmt::layer().json().with_writer(std::io::stderr)).init(),
        LogFormat::Text => registry.with(fmt::layer().with_writer(std::io::stderr)).init(),
    }

    info!(
        "Starting seat booking client ({}) against {}",
        config.app.environment, config.api.base_url
    );

    let mut client = ReservationClient::from_config(config).context("failed to create booking client")?;

    match client.restore_session().await {
        Ok(true) => println!("Welcome back."),
        Ok(false) => println!("Not signed in. Type `login` to sign in, `help` for commands."),
        Err(e) => warn!("Could not restore the previous session: {}", e),
    }
    println!("{}", client.seat_map());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", HELP),
            Command::ShowMap => println!("{}", client.seat_map()),
            Command::Unknown(input) => println!("unknown command `{}`, try `help`", input),
            Command::Event(event) => {
                let notice = client.handle(event).await;
                if let Some(message) = notice.message() {
                    println!("{}", message);
                }
                if matches!(notice, Notice::Booked(_) | Notice::SignedIn { .. } | Notice::SignedOut) {
                    println!("{}", client.seat_map());
                }
                if let Some(prompt) = client.session_gate().prompt() {
                    println!(
                        "[{}] email: {:?}  password: {}",
                        prompt.tab.label(),
                        prompt.email,
                        if prompt.password.is_empty() { "(empty)" } else { "***" }
                    );
                }
            }
        }
    }

    info!("Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_seat_clicks() {
        assert_eq!(parse_command("select 12"), Command::Event(UiEvent::SeatClicked(12)));
        assert_eq!(parse_command("  7 "), Command::Event(UiEvent::SeatClicked(7)));
        assert!(matches!(parse_command("select x"), Command::Unknown(_)));
    }

    #[test]
    fn count_keeps_raw_text() {
        assert_eq!(
            parse_command("count three"),
            Command::Event(UiEvent::CountChanged("three".to_string()))
        );
    }

    #[test]
    fn misc_commands() {
        assert_eq!(parse_command(""), Command::ShowMap);
        assert_eq!(parse_command("QUIT"), Command::Quit);
        assert_eq!(parse_command("signup"), Command::Event(UiEvent::SwitchAuthTab(AuthTab::Signup)));
        assert!(matches!(parse_command("dance"), Command::Unknown(_)));
    }
}
