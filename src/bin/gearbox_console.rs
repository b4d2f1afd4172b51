//! Interactive terminal entry point.
//!
//! ```sh
//! cargo run --bin gearbox_console --features console
//! ```
//!
//! Hold Up to accelerate, Down to brake; Esc or `q` exits.

use rs_gearbox::console::run_console;
use rs_gearbox::Config;

fn main() -> anyhow::Result<()> {
    let config = Config::default();
    run_console(&config.console)?;
    println!("Simulation ended.");
    Ok(())
}
