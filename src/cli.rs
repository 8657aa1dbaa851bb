//! Line-oriented terminal front end
//!
//! Reads one message per line from its input and prints the transcript as it
//! changes. Exchanges run in their own task so `/clear` stays available
//! while a reply is pending.

use crate::responder::Responder;
use crate::runtime::{Composer, IgnoreReason, Session, SessionEvent, SUGGESTED_PROMPTS};
use crate::state_machine::ExchangeOutcome;
use crate::transcript::{Role, Turn};
use chrono::Local;
use std::fmt::Write as _;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    /// 1-based index into `SUGGESTED_PROMPTS`
    Suggestion(usize),
    Clear,
    Help,
    Quit,
}

pub fn parse_command(line: &str) -> Command {
    match line.trim() {
        "/clear" => Command::Clear,
        "/help" => Command::Help,
        "/quit" | "/exit" => Command::Quit,
        other => match other.strip_prefix('/').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) => Command::Suggestion(n),
            None => Command::Send(line.to_string()),
        },
    }
}

pub fn welcome_text() -> String {
    let mut text = String::from("Hello! I'm Yuktra\nYour AI Assistant - Ask me anything!\n");
    for (i, prompt) in SUGGESTED_PROMPTS.iter().enumerate() {
        let _ = writeln!(text, "  /{} {prompt}", i + 1);
    }
    text
}

pub fn help_text() -> &'static str {
    "Type a message and press Enter to send.\n  \
     /1../3  send a suggested prompt\n  \
     /clear  clear the conversation\n  \
     /quit   exit"
}

/// Render one turn for the terminal
pub fn format_turn(turn: &Turn) -> String {
    let label = match turn.role() {
        Role::User => "you",
        Role::Bot => "yuktra",
    };
    let time = turn.created_at().with_timezone(&Local).format("%H:%M");
    let body = turn.content().replace('\n', "\n    ");
    format!("[{time}] {label}> {body}")
}

fn print_event(event: &SessionEvent) {
    match event {
        SessionEvent::TurnAppended { turn, .. } => println!("{}", format_turn(turn)),
        SessionEvent::Cleared => {
            println!("-- conversation cleared --");
            println!("{}", welcome_text());
        }
        SessionEvent::PendingChanged { pending: true } => println!("yuktra is thinking..."),
        SessionEvent::PendingChanged { pending: false } => {}
    }
}

/// Print session changes until the session goes away or `stop` fires.
///
/// On stop, events already queued are still printed.
async fn render_events(
    mut rx: broadcast::Receiver<SessionEvent>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            biased;
            event = rx.recv() => match event {
                Ok(event) => print_event(&event),
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Renderer fell behind");
                }
                Err(RecvError::Closed) => break,
            },
            _ = &mut stop => {
                while let Ok(event) = rx.try_recv() {
                    print_event(&event);
                }
                break;
            }
        }
    }
}

/// Run the interactive loop over `input` until `/quit` or end of input
pub async fn run<R, I>(session: Session<R>, input: I) -> std::io::Result<()>
where
    R: Responder + 'static,
    I: AsyncBufRead + Unpin,
{
    let (stop_tx, stop_rx) = oneshot::channel();
    let renderer = tokio::spawn(render_events(session.subscribe(), stop_rx));
    let mut composer = Composer::new();
    let mut in_flight: Option<JoinHandle<ExchangeOutcome>> = None;

    println!("{}", welcome_text());

    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        match parse_command(&line) {
            Command::Quit => {
                renderer.abort();
                if let Some(task) = in_flight.take() {
                    task.abort();
                }
                return Ok(());
            }
            Command::Clear => session.clear(),
            Command::Help => println!("{}", help_text()),
            Command::Suggestion(n) => {
                if n == 0 || !composer.use_suggestion(n - 1) {
                    println!("No suggestion /{n}. Try /help.");
                    continue;
                }
                in_flight = send(&mut composer, &session).or(in_flight);
            }
            Command::Send(text) => {
                composer.set(text);
                if !composer.is_sendable() {
                    continue;
                }
                in_flight = send(&mut composer, &session).or(in_flight);
            }
        }
    }

    // End of input: let the outstanding reply land before exiting
    if let Some(task) = in_flight.take() {
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Exchange task failed");
        }
    }
    let _ = stop_tx.send(());
    let _ = renderer.await;
    Ok(())
}

fn send<R: Responder + 'static>(
    composer: &mut Composer,
    session: &Session<R>,
) -> Option<JoinHandle<ExchangeOutcome>> {
    match composer.send(session) {
        Ok(exchange) => Some(tokio::spawn(exchange.settle())),
        Err(IgnoreReason::ExchangeInFlight) => {
            println!("(still waiting for the last reply)");
            None
        }
        Err(IgnoreReason::EmptyInput) => None,
    }
}
