//! Observer demo: pushes a simulated day/night cycle to the presenter.

use std::time::Duration;

use tracing_subscriber::EnvFilter;

use worldsync_client::{PushThrottle, WorldStateClient};
use worldsync_core::DAY_LENGTH;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let client = WorldStateClient::new();
    client.connect()?;

    // Shortened cadence so the demo is watchable; a real game observer keeps
    // the default 10 s period.
    let mut throttle = PushThrottle::new(Duration::from_millis(500));
    let mut tick: u16 = 0;
    let mut pushed = 0u32;

    while pushed < 240 {
        if throttle.ready() {
            client
                .update()
                .set_time(tick)
                .set_paused(false)
                .set_raining(tick >= 18000)
                .push()?;
            throttle.mark();

            tick = (tick + 200) % DAY_LENGTH;
            pushed += 1;
        }

        std::thread::sleep(Duration::from_millis(20));
    }

    client.disconnect();
    Ok(())
}
