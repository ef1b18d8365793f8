// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Long-running monitor with automatic drains.

use std::future::Future;
use std::io::Write;

use chrono::Local;
use outbox_core::ConnectivityState;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::{build_engine, open_store};
use crate::config::Config;
use crate::error::Result;
use crate::monitor::{ConnectivityMonitor, HttpProbe, SocketGuard};
use crate::transport::WebSocketTransport;

/// Run until Ctrl-C.
pub async fn run(config: &Config, out: &mut dyn Write) -> Result<()> {
    run_until(config, out, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Print every connectivity transition until `shutdown` completes.
///
/// The queue is drained on start if the backend is reachable, and again on
/// every reconnect.
pub async fn run_until(
    config: &Config,
    out: &mut dyn Write,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let engine = build_engine(config, open_store(config)?)?;
    let monitor = ConnectivityMonitor::new();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let printer = monitor.subscribe(move |state| {
        let _ = tx.send(state);
    });
    let drains = engine.drain_on_reconnect(&monitor);

    let probe = HttpProbe::new(config.health_url(), config.health_check().timeout)?;
    let health = monitor.start_health_checks(probe, config.health_check());
    let socket = attach_socket(config, &monitor).await;

    info!(
        health_url = %config.health_url(),
        socket = config.socket_url.as_deref().unwrap_or("none"),
        "watching connectivity"
    );

    tokio::pin!(shutdown);
    loop {
        tokio::select! {
            biased;
            Some(state) = rx.recv() => print_transition(out, state)?,
            _ = &mut shutdown => break,
        }
    }

    drains.unsubscribe();
    printer.unsubscribe();
    while let Ok(state) = rx.try_recv() {
        print_transition(out, state)?;
    }
    health.teardown();
    if let Some(socket) = socket {
        socket.teardown();
    }
    monitor.dispose();
    Ok(())
}

fn print_transition(out: &mut dyn Write, state: ConnectivityState) -> Result<()> {
    writeln!(out, "{}  {}", Local::now().format("%H:%M:%S"), state)?;
    out.flush()?;
    Ok(())
}

/// Connect the heartbeat socket if one is configured.
///
/// A socket that cannot be reached is logged; HTTP probing carries on alone.
async fn attach_socket(config: &Config, monitor: &ConnectivityMonitor) -> Option<SocketGuard> {
    let url = config.socket_url.as_deref()?;
    match WebSocketTransport::connect(url).await {
        Ok((sender, receiver)) => Some(monitor.attach_socket(sender, receiver, config.heartbeat())),
        Err(e) => {
            warn!(url, "heartbeat socket unavailable: {}", e);
            None
        }
    }
}

#[cfg(test)]
#[path = "watch_tests.rs"]
mod tests;
