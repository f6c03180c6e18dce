use chrono::Utc;
use std::thread;
use tracing::{debug, info};

use forex_tools::{forex_sessions, ClockConfig, MarketSnapshot};

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    forex_tools::init_logging();

    let config = ClockConfig::from_env();
    let display = config.display_timezone()?;
    info!(
        utc_offset_hours = config.utc_offset_hours,
        interval_secs = config.update_interval.as_secs(),
        "starting session clock"
    );

    loop {
        let now = Utc::now().with_timezone(&display);
        let snapshot = MarketSnapshot::capture(forex_sessions(), &now, &display);
        debug!(open = ?snapshot.open_sessions(), "snapshot taken");
        println!("{}", snapshot);
        println!("\nWaiting for next update...\n");
        thread::sleep(config.update_interval);
    }
}
