// Interactive shell — one command per line until `exit` or end of input

use crate::render::{self, OutputMode};
use anyhow::Result;
use cdnsim_core::{CdnSimulator, Latency, NodeId};
use std::io::{BufRead, Write};
use thiserror::Error;

const ADD_USER_USAGE: &str = "Usage: addUser <newUserId> <connectToNodeId> <latency>";
const REQUEST_USAGE: &str = "Usage: request <userId> <contentName>";
const CACHE_USAGE: &str = "Usage: cache <serverId>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddUser {
        id: NodeId,
        connect_to: NodeId,
        latency: Latency,
    },
    Request {
        user: NodeId,
        content: String,
    },
    Cache {
        server: NodeId,
    },
    Mst,
    Stats,
    Help,
    Exit,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("{0}")]
    Usage(&'static str),
    #[error("Unknown command '{0}'. Type 'help' for commands.")]
    Unknown(String),
}

/// Parse one non-empty input line
pub fn parse_command(line: &str) -> Result<Command, CommandError> {
    let mut words = line.split_whitespace();
    let name = words.next().unwrap_or_default();

    match name {
        "addUser" => parse_add_user(words).ok_or(CommandError::Usage(ADD_USER_USAGE)),
        "request" => {
            let user = words.next().and_then(|w| w.parse().ok());
            let content = words.next();
            match (user, content) {
                (Some(user), Some(content)) => Ok(Command::Request {
                    user,
                    content: content.to_string(),
                }),
                _ => Err(CommandError::Usage(REQUEST_USAGE)),
            }
        }
        "cache" => words
            .next()
            .and_then(|w| w.parse().ok())
            .map(|server| Command::Cache { server })
            .ok_or(CommandError::Usage(CACHE_USAGE)),
        "mst" => Ok(Command::Mst),
        "stats" => Ok(Command::Stats),
        "help" => Ok(Command::Help),
        "exit" => Ok(Command::Exit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

fn parse_add_user<'a>(mut words: impl Iterator<Item = &'a str>) -> Option<Command> {
    let id = words.next()?.parse().ok()?;
    let connect_to = words.next()?.parse().ok()?;
    let latency = words.next()?.parse().ok()?;
    Some(Command::AddUser {
        id,
        connect_to,
        latency,
    })
}

/// Drive the simulator from `input` until `exit` or end of input
pub fn run<R: BufRead, W: Write>(
    sim: &mut CdnSimulator,
    input: R,
    out: &mut W,
    mode: OutputMode,
) -> Result<()> {
    let mut lines = input.lines();

    loop {
        if mode == OutputMode::Human {
            write!(out, "> ")?;
            out.flush()?;
        }

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let command = match parse_command(line) {
            Ok(command) => command,
            Err(err) => {
                render::notice(out, mode, &err.to_string())?;
                continue;
            }
        };

        match command {
            Command::AddUser {
                id,
                connect_to,
                latency,
            } => {
                let outcome = sim.add_user(id, connect_to, latency);
                render::user_added(out, mode, id, connect_to, &outcome)?;
            }
            Command::Request { user, content } => {
                let outcome = sim.resolve_request(user, &content);
                render::request(out, mode, user, &content, &outcome)?;
            }
            Command::Cache { server } => {
                render::cached_contents(out, mode, server, sim.cached_contents(server).as_deref())?
            }
            Command::Mst => render::backbone(out, mode, &sim.compute_backbone())?,
            Command::Stats => render::stats(out, mode, sim.stats())?,
            Command::Help => render::help(out, mode)?,
            Command::Exit => {
                if mode == OutputMode::Human {
                    render::notice(out, mode, "Exiting simulator.")?;
                }
                break;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::apply_config;

    const NETWORK: &str = "\
NODE ORIGIN 1
NODE SERVER 2 1
EDGE 1 2 10
";

    fn session(script: &str, mode: OutputMode) -> (CdnSimulator, String) {
        colored::control::set_override(false);
        let mut sim = CdnSimulator::new();
        apply_config(NETWORK, &mut sim);
        let mut out = Vec::new();
        run(&mut sim, script.as_bytes(), &mut out, mode).unwrap();
        (sim, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_add_user() {
        assert_eq!(
            parse_command("addUser 100 2 5"),
            Ok(Command::AddUser {
                id: 100,
                connect_to: 2,
                latency: 5
            })
        );
    }

    #[test]
    fn test_parse_request() {
        assert_eq!(
            parse_command("request 100 a.mp4"),
            Ok(Command::Request {
                user: 100,
                content: "a.mp4".to_string()
            })
        );
    }

    #[test]
    fn test_parse_usage_errors() {
        assert_eq!(
            parse_command("addUser 100 2"),
            Err(CommandError::Usage(ADD_USER_USAGE))
        );
        assert_eq!(
            parse_command("addUser x 2 5"),
            Err(CommandError::Usage(ADD_USER_USAGE))
        );
        assert_eq!(
            parse_command("request abc a.mp4"),
            Err(CommandError::Usage(REQUEST_USAGE))
        );
        assert_eq!(
            parse_command("request 100"),
            Err(CommandError::Usage(REQUEST_USAGE))
        );
    }

    #[test]
    fn test_parse_simple_commands() {
        assert_eq!(parse_command("mst"), Ok(Command::Mst));
        assert_eq!(parse_command("cache 2"), Ok(Command::Cache { server: 2 }));
        assert_eq!(parse_command("cache"), Err(CommandError::Usage(CACHE_USAGE)));
        assert_eq!(parse_command("stats"), Ok(Command::Stats));
        assert_eq!(parse_command("help"), Ok(Command::Help));
        assert_eq!(parse_command("exit"), Ok(Command::Exit));
        assert_eq!(
            parse_command("quit"),
            Err(CommandError::Unknown("quit".to_string()))
        );
    }

    #[test]
    fn test_scripted_session() {
        let script = "addUser 100 2 5\nrequest 100 a.mp4\nrequest 100 a.mp4\nmst\nexit\nrequest 100 b.mp4\n";
        let (sim, text) = session(script, OutputMode::Human);

        assert!(text.contains("User 100 added and connected to 2"));
        assert!(text.contains("[MISS]"));
        assert!(text.contains("[HIT]"));
        assert!(text.contains("Total cost: 10ms"));
        assert!(text.contains("Exiting simulator."));
        // Nothing after exit runs
        assert_eq!(sim.stats().requests, 2);
        assert!(sim.contents().id_of("b.mp4").is_none());
    }

    #[test]
    fn test_session_ends_at_end_of_input() {
        let (sim, _) = session("addUser 100 2 5\nrequest 100 a.mp4", OutputMode::Human);
        assert_eq!(sim.stats().misses, 1);
    }

    #[test]
    fn test_session_survives_bad_commands() {
        let script = "bogus\n\naddUser 100\nrequest 555 a.mp4\naddUser 100 2 5\nrequest 100 a.mp4\n";
        let (sim, text) = session(script, OutputMode::Human);

        assert!(text.contains("Unknown command 'bogus'"));
        assert!(text.contains(ADD_USER_USAGE));
        assert!(text.contains("User 555 does not exist"));
        assert_eq!(sim.stats().failures, 1);
        assert_eq!(sim.stats().misses, 1);
    }

    #[test]
    fn test_cache_command_lists_most_recent_first() {
        let script = "addUser 100 2 5\nrequest 100 a.mp4\ncache 2\ncache 1\n";
        let (_, text) = session(script, OutputMode::Human);

        assert!(text.contains("Server 2 cache (1 entries)"));
        assert!(text.contains("1  a.mp4"));
        assert!(text.contains("Node 1 is not an edge server"));
    }

    #[test]
    fn test_json_session_emits_one_object_per_command() {
        let script = "addUser 100 2 5\nrequest 100 a.mp4\nstats\n";
        let (_, text) = session(script, OutputMode::Json);

        let events: Vec<serde_json::Value> = text
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0]["event"], "add_user");
        assert_eq!(events[1]["delivery"]["latency"]["to_server"], 5);
        assert_eq!(events[2]["stats"]["misses"], 1);
    }
}
