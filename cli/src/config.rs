// Network configuration loader
//
// Topology files are line oriented:
//
//   # comment
//   NODE SERVER <id> [<capacity>]
//   NODE GATEWAY <id>
//   NODE ORIGIN <id>
//   EDGE <u> <v> <latency>
//
// Bad lines are skipped with a warning; loading never stops early.

use anyhow::{bail, Context, Result};
use cdnsim_core::{CdnSimulator, Latency, NodeId, NodeRole};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// One meaningful configuration line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Node {
        role: NodeRole,
        id: NodeId,
        capacity: usize,
    },
    Edge {
        u: NodeId,
        v: NodeId,
        latency: Latency,
    },
}

/// What a load applied and what it had to skip
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub nodes: usize,
    pub edges: usize,
    /// Unparseable lines plus directives the network rejected
    pub skipped: usize,
}

/// Parse one line. Blank lines and comments yield `None`.
pub fn parse_line(line: &str) -> Result<Option<Directive>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split_whitespace();
    let keyword = fields.next().unwrap_or_default();

    match keyword {
        "NODE" => {
            let kind = fields.next().context("NODE is missing its type")?;
            let role = match kind {
                "SERVER" => NodeRole::EdgeServer,
                "GATEWAY" => NodeRole::Gateway,
                "ORIGIN" => NodeRole::Origin,
                other => bail!("Unknown node type '{}'", other),
            };
            let id = parse_field::<NodeId>(fields.next(), "node id")?;
            let capacity = match (role, fields.next()) {
                (NodeRole::EdgeServer, Some(raw)) => server_capacity(id, raw),
                _ => 0,
            };
            Ok(Some(Directive::Node { role, id, capacity }))
        }
        "EDGE" => {
            let u = parse_field::<NodeId>(fields.next(), "edge endpoint")?;
            let v = parse_field::<NodeId>(fields.next(), "edge endpoint")?;
            let latency = parse_field::<Latency>(fields.next(), "latency")?;
            Ok(Some(Directive::Edge { u, v, latency }))
        }
        other => bail!("Unknown keyword '{}'", other),
    }
}

/// Cache capacity of a server line. Zero, negative or garbled values still
/// register the server, with a cache that never stores anything.
fn server_capacity(id: NodeId, raw: &str) -> usize {
    match raw.parse::<i64>() {
        Ok(value) => usize::try_from(value).unwrap_or(0),
        Err(_) => {
            warn!("Server {}: invalid capacity '{}', using 0", id, raw);
            0
        }
    }
}

fn parse_field<T: std::str::FromStr>(raw: Option<&str>, what: &str) -> Result<T> {
    let raw = raw.with_context(|| format!("Missing {}", what))?;
    raw.parse::<T>()
        .map_err(|_| anyhow::anyhow!("Invalid {} '{}'", what, raw))
}

/// Apply configuration text to the simulator, line by line
pub fn apply_config(text: &str, sim: &mut CdnSimulator) -> LoadReport {
    let mut report = LoadReport::default();

    for (number, line) in text.lines().enumerate() {
        let directive = match parse_line(line) {
            Ok(Some(directive)) => directive,
            Ok(None) => continue,
            Err(e) => {
                warn!("Config line {}: {}. Skipping.", number + 1, e);
                report.skipped += 1;
                continue;
            }
        };

        let applied = match directive {
            Directive::Node { role, id, capacity } => sim
                .add_node(id, role, capacity)
                .map(|_| report.nodes += 1),
            Directive::Edge { u, v, latency } => {
                sim.add_edge(u, v, latency).map(|_| report.edges += 1)
            }
        };
        if let Err(e) = applied {
            warn!("Config line {}: {}", number + 1, e);
            report.skipped += 1;
        }
    }

    report
}

/// Read a configuration file and apply it
pub fn load_config(path: &Path, sim: &mut CdnSimulator) -> Result<LoadReport> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not open config file {}", path.display()))?;
    Ok(apply_config(&contents, sim))
}
