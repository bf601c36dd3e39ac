// =============================================================================
// Command Dispatcher — chat-style text commands
// =============================================================================
//
//   /start            welcome text
//   /ping             liveness check
//   /help, /hulp      command list
//   /analyse <coin>   multi-timeframe analysis (alias /analyze)
//
// Every command yields a reply string; resolution errors are turned into
// user-facing messages here and never reach the analysis path.
// =============================================================================

use tracing::{debug, info};

use crate::app_state::AppState;
use crate::error::ResolveError;
use crate::market_data::{CandleSource, SymbolSource};

pub const USAGE: &str = "Usage: /analyse <coin> (e.g. BTC or BTCUSDT)";

pub const HELP: &str = "Available commands:\n\
                        /analyse <coin> - Technical analysis of a coin\n\
                        /ping - Check whether the bot is alive\n\
                        /start - Welcome message\n\
                        /help - This help message";

const WELCOME: &str = "Welcome! Use /analyse <coin>, /ping or /help.";

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command<'a> {
    Start,
    Ping,
    Help,
    Analyse(Option<&'a str>),
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    /// Parse `text`.  A `@botname` suffix on the command word is ignored.
    pub fn parse(text: &'a str) -> Self {
        let mut parts = text.split_whitespace();
        let Some(head) = parts.next() else {
            return Self::Unknown("");
        };
        let name = head.split('@').next().unwrap_or(head);

        match name.to_ascii_lowercase().as_str() {
            "/start" => Self::Start,
            "/ping" => Self::Ping,
            "/help" | "/hulp" => Self::Help,
            "/analyse" | "/analyze" => Self::Analyse(parts.next()),
            _ => Self::Unknown(head),
        }
    }
}

/// Map a resolution failure to the reply shown to the user.
pub fn resolve_error_reply(err: &ResolveError) -> String {
    match err {
        ResolveError::EmptyInput => USAGE.to_string(),
        ResolveError::UnknownSymbol(ticker) => format!(
            "No trading pairs found for {ticker}. Check the ticker and try again."
        ),
        ResolveError::RegistryUnavailable(_) => {
            "The symbol list is currently unavailable. Please try again later.".to_string()
        }
    }
}

/// Handle one line of user text and produce the reply.
pub async fn handle_command<S>(state: &AppState<S>, text: &str) -> String
where
    S: SymbolSource + CandleSource,
{
    let command = Command::parse(text);
    debug!(?command, "command received");

    match command {
        Command::Start => WELCOME.to_string(),
        Command::Ping => "Pong!".to_string(),
        Command::Help => HELP.to_string(),
        Command::Analyse(None) => USAGE.to_string(),
        Command::Analyse(Some(coin)) => {
            let registry = state.registry.snapshot();
            let symbol = match registry.resolve(coin) {
                Ok(symbol) => symbol,
                Err(e) => {
                    info!(coin, error = %e, "analyse rejected");
                    return resolve_error_reply(&e);
                }
            };
            let report = state.analyze(&symbol).await;
            format!("Analysis for {}:\n\n{}", symbol, report.render())
        }
        Command::Unknown(_) => "Unknown command. Use /help to see what I can do.".to_string(),
    }
}
