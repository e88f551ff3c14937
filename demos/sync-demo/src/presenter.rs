//! Presenter demo: listens for world-state updates and prints them.
//!
//! Run the `observer` binary in a second terminal to feed it.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use worldsync_core::{Message, DEFAULT_PORT};
use worldsync_server::{DispatchGate, SyncSupervisor, WorldStateServer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let gate = Arc::new(DispatchGate::new());
    let supervisor = SyncSupervisor::new(WorldStateServer::new(Arc::clone(&gate)));

    // A real presenter feeds its persisted settings flag through here
    supervisor.apply(true)?;

    println!("presenter listening on 127.0.0.1:{DEFAULT_PORT}, waiting for updates ...");

    loop {
        // the presentation tick: all consumer code runs on this thread
        gate.drain(render);
        std::thread::sleep(Duration::from_millis(250));
    }
}

fn render(message: Message) {
    println!(
        "world at tick {} ({:.0}% through the day){}{}",
        message.time_of_day(),
        message.day_fraction() * 100.0,
        if message.raining { ", raining" } else { "" },
        if message.paused { " [paused]" } else { "" },
    );
}
