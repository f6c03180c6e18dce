use std::io::{self, BufRead, Write};
use tracing::{debug, warn};

use forex_tools::pivot::{parse_price, pivot_sets, PriceBar};
use forex_tools::Error;

fn prompt_price(field: &'static str) -> anyhow::Result<rust_decimal::Decimal> {
    print!("Enter the {} price: ", field);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(parse_price(field, &line)?)
}

fn read_bar() -> anyhow::Result<PriceBar> {
    let high = prompt_price("high")?;
    let low = prompt_price("low")?;
    let close = prompt_price("close")?;
    let open = prompt_price("open")?;
    Ok(PriceBar {
        open,
        high,
        low,
        close,
    })
}

fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    forex_tools::init_logging();

    let bar = match read_bar() {
        Ok(bar) => bar,
        Err(err) => {
            let invalid = match err.downcast::<Error>() {
                Ok(invalid @ Error::InvalidNumericInput { .. }) => invalid,
                Ok(other) => return Err(other.into()),
                Err(err) => return Err(err),
            };
            warn!(error = %invalid, "rejected price input");
            println!(
                "Error: {}\nPlease enter valid decimal numbers for high, low, close, and open prices.",
                invalid
            );
            return Ok(());
        }
    };
    debug!(?bar, "computing pivots");

    for set in pivot_sets(&bar) {
        println!("\n{}", set);
    }
    Ok(())
}
