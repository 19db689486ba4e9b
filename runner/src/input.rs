use std::io::BufRead;

use snake_engine::{AgentId, log};
use tokio::sync::mpsc;

use crate::session::SessionCommand;

/// Accepted lines:
/// `quit` / `exit`, `new`, `<agent-id> <key>` or a bare `<key>` routed through
/// every agent's bindings.
pub fn parse_command(line: &str) -> Option<SessionCommand> {
    let mut parts = line.split_whitespace();
    let first = parts.next()?;
    let second = parts.next();
    if parts.next().is_some() {
        return None;
    }

    match (first, second) {
        ("quit" | "exit", None) => Some(SessionCommand::Quit),
        ("new", None) => Some(SessionCommand::NewGame),
        (key, None) => Some(SessionCommand::Key {
            agent: None,
            key: key.to_string(),
        }),
        (agent, Some(key)) => {
            let agent = agent.parse::<u32>().ok()?;
            Some(SessionCommand::Key {
                agent: Some(AgentId::new(agent)),
                key: key.to_string(),
            })
        }
    }
}

/// Forwards stdin lines as commands until EOF, which is treated as `quit`.
/// Runs on a plain thread so a pending read never holds up runtime shutdown.
pub fn spawn_stdin_reader(tx: mpsc::UnboundedSender<SessionCommand>) {
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    log!("Failed to read stdin: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Some(command) => {
                    if tx.send(command).is_err() {
                        return;
                    }
                }
                None => log!("Unrecognized input: {}", line.trim()),
            }
        }
        let _ = tx.send(SessionCommand::Quit);
    });
}
