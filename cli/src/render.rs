// Console rendering — human-readable or one JSON object per line

use crate::config::LoadReport;
use cdnsim_core::{
    BackboneError, BackbonePlan, CacheStatus, ContentId, Delivery, DeliveryStats, NodeId,
    RequestError, TopologyError,
};
use colored::*;
use serde_json::json;
use std::io::{self, Write};

/// How outcomes are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

fn emit_json<W: Write>(out: &mut W, value: serde_json::Value) -> io::Result<()> {
    writeln!(out, "{}", value)
}

fn path_string(path: &[NodeId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" → ")
}

pub fn load_report<W: Write>(out: &mut W, mode: OutputMode, source: &str, report: &LoadReport) -> io::Result<()> {
    match mode {
        OutputMode::Json => emit_json(out, json!({ "event": "config", "source": source, "report": report })),
        OutputMode::Human => {
            writeln!(
                out,
                "{} Loaded {}: {} nodes, {} edges",
                "✓".green(),
                source.bright_cyan(),
                report.nodes,
                report.edges
            )?;
            if report.skipped > 0 {
                writeln!(out, "  {} {} lines skipped (see warnings)", "!".yellow(), report.skipped)?;
            }
            Ok(())
        }
    }
}

pub fn request<W: Write>(
    out: &mut W,
    mode: OutputMode,
    user_id: NodeId,
    content_name: &str,
    outcome: &Result<Delivery, RequestError>,
) -> io::Result<()> {
    if mode == OutputMode::Json {
        let value = match outcome {
            Ok(delivery) => json!({ "event": "request", "delivery": delivery }),
            Err(err) => json!({
                "event": "request",
                "user_id": user_id,
                "content_name": content_name,
                "error": err,
                "message": err.to_string(),
            }),
        };
        return emit_json(out, value);
    }

    writeln!(
        out,
        "{}",
        format!("Request: user {} → '{}'", user_id, content_name).bold()
    )?;

    let delivery = match outcome {
        Ok(delivery) => delivery,
        Err(err) => {
            writeln!(out, "  {} {}", "✗".red(), err.to_string().red())?;
            return Ok(());
        }
    };

    writeln!(
        out,
        "  Edge server:  {} ({}ms, route {})",
        delivery.server_id.to_string().bright_cyan(),
        delivery.latency.to_server,
        path_string(&delivery.server_route)
    )?;

    match delivery.status {
        CacheStatus::Hit => {
            writeln!(
                out,
                "  {} content {} served from server {}",
                "[HIT]".green().bold(),
                delivery.content_id,
                delivery.server_id
            )?;
        }
        CacheStatus::Miss => {
            writeln!(
                out,
                "  {} content {} not on server {}, fetched from origin",
                "[MISS]".yellow().bold(),
                delivery.content_id,
                delivery.server_id
            )?;
            if let (Some(to_origin), Some(route)) = (delivery.latency.to_origin, &delivery.origin_route) {
                writeln!(out, "  Origin:       {}ms (route {})", to_origin, path_string(route))?;
            }
            if let Some(evicted) = delivery.evicted {
                writeln!(out, "  Evicted:      content {}", evicted)?;
            }
        }
    }

    match delivery.latency.to_origin {
        Some(to_origin) => writeln!(
            out,
            "  Total latency: {} ({}ms to server + {}ms to origin)",
            format!("{}ms", delivery.total_latency()).bright_yellow(),
            delivery.latency.to_server,
            to_origin
        ),
        None => writeln!(
            out,
            "  Total latency: {}",
            format!("{}ms", delivery.total_latency()).bright_yellow()
        ),
    }
}

pub fn backbone<W: Write>(out: &mut W, mode: OutputMode, outcome: &Result<BackbonePlan, BackboneError>) -> io::Result<()> {
    if mode == OutputMode::Json {
        let value = match outcome {
            Ok(plan) => json!({
                "event": "backbone",
                "plan": plan,
                "edge_count": plan.edge_count(),
                "spanning": plan.is_spanning(),
            }),
            Err(err) => json!({ "event": "backbone", "error": err, "message": err.to_string() }),
        };
        return emit_json(out, value);
    }

    let plan = match outcome {
        Ok(plan) => plan,
        Err(err) => return writeln!(out, "{} {}", "✗".red(), err.to_string().red()),
    };

    writeln!(out, "{}", "Backbone (minimum spanning tree)".bold())?;
    for edge in &plan.edges {
        writeln!(out, "  {} — {}  {}ms", edge.from, edge.to, edge.cost)?;
    }
    writeln!(
        out,
        "  Nodes: {}  Edges: {}  Total cost: {}",
        plan.node_count,
        plan.edge_count(),
        format!("{}ms", plan.total_cost).bright_yellow()
    )?;
    if !plan.is_spanning() {
        writeln!(
            out,
            "  {} backbone is disconnected, tree reaches {} of {} nodes",
            "!".yellow(),
            plan.edge_count() + 1,
            plan.node_count
        )?;
    }
    Ok(())
}

pub fn user_added<W: Write>(
    out: &mut W,
    mode: OutputMode,
    user_id: NodeId,
    connect_to: NodeId,
    outcome: &Result<(), TopologyError>,
) -> io::Result<()> {
    match (mode, outcome) {
        (OutputMode::Json, Ok(())) => emit_json(
            out,
            json!({ "event": "add_user", "user_id": user_id, "connected_to": connect_to }),
        ),
        (OutputMode::Json, Err(err)) => emit_json(
            out,
            json!({ "event": "add_user", "user_id": user_id, "error": err, "message": err.to_string() }),
        ),
        (OutputMode::Human, Ok(())) => writeln!(
            out,
            "{} User {} added and connected to {}",
            "✓".green(),
            user_id.to_string().bright_cyan(),
            connect_to
        ),
        (OutputMode::Human, Err(err)) => writeln!(out, "{} {}", "✗".red(), err.to_string().red()),
    }
}

pub fn stats<W: Write>(out: &mut W, mode: OutputMode, stats: &DeliveryStats) -> io::Result<()> {
    match mode {
        OutputMode::Json => emit_json(
            out,
            json!({ "event": "stats", "stats": stats, "hit_ratio": stats.hit_ratio() }),
        ),
        OutputMode::Human => {
            writeln!(out, "{}", "Delivery statistics".bold())?;
            writeln!(out, "  {:<10} {}", "requests".bright_cyan(), stats.requests)?;
            writeln!(out, "  {:<10} {}", "hits".bright_cyan(), stats.hits)?;
            writeln!(out, "  {:<10} {}", "misses".bright_cyan(), stats.misses)?;
            writeln!(out, "  {:<10} {}", "failures".bright_cyan(), stats.failures)?;
            writeln!(out, "  {:<10} {}", "evictions".bright_cyan(), stats.evictions)?;
            writeln!(out, "  {:<10} {:.1}%", "hit ratio".bright_cyan(), stats.hit_ratio() * 100.0)
        }
    }
}

/// Cache listing of one server; `entries` is `None` for non-servers
pub fn cached_contents<W: Write>(
    out: &mut W,
    mode: OutputMode,
    server_id: NodeId,
    entries: Option<&[(ContentId, String)]>,
) -> io::Result<()> {
    let Some(entries) = entries else {
        let message = format!("Node {} is not an edge server", server_id);
        return match mode {
            OutputMode::Json => emit_json(
                out,
                json!({ "event": "cache", "server_id": server_id, "message": message }),
            ),
            OutputMode::Human => writeln!(out, "{} {}", "✗".red(), message.red()),
        };
    };

    if mode == OutputMode::Json {
        let listing: Vec<_> = entries
            .iter()
            .map(|(id, name)| json!({ "content_id": id, "content_name": name }))
            .collect();
        return emit_json(
            out,
            json!({ "event": "cache", "server_id": server_id, "entries": listing }),
        );
    }

    writeln!(
        out,
        "{}",
        format!("Server {} cache ({} entries)", server_id, entries.len()).bold()
    )?;
    for (id, name) in entries {
        writeln!(out, "  {}  {}", id.to_string().bright_cyan(), name)?;
    }
    Ok(())
}

const COMMANDS: [&str; 7] = [
    "addUser <newUserId> <connectToNodeId> <latency>",
    "request <userId> <contentName>",
    "cache <serverId>",
    "mst",
    "stats",
    "help",
    "exit",
];

pub fn help<W: Write>(out: &mut W, mode: OutputMode) -> io::Result<()> {
    if mode == OutputMode::Json {
        return emit_json(out, json!({ "event": "help", "commands": COMMANDS }));
    }
    writeln!(out, "{}", "Commands:".bold())?;
    for usage in COMMANDS {
        let (name, args) = usage.split_once(' ').unwrap_or((usage, ""));
        writeln!(out, "  {} {}", name.bright_green(), args)?;
    }
    Ok(())
}

pub fn notice<W: Write>(out: &mut W, mode: OutputMode, message: &str) -> io::Result<()> {
    match mode {
        OutputMode::Json => emit_json(out, json!({ "event": "notice", "message": message })),
        OutputMode::Human => writeln!(out, "{}", message.dimmed()),
    }
}
