//! Web server entry point.
//!
//! Serves the browser UI and the three-route simulation API:
//!
//! ```sh
//! cargo run --bin gearbox_server --features web
//! ```
//!
//! Then open http://localhost:8080 and drive with the on-page controls, or
//! poke the API directly:
//!
//! ```sh
//! curl 'http://localhost:8080/step?accelerate=1'
//! curl 'http://localhost:8080/reset'
//! ```

use std::sync::Arc;

use rs_gearbox::services::{run_server, SharedGearbox, WebServerConfig};
use rs_gearbox::Config;

fn main() -> anyhow::Result<()> {
    let rt = tokio::runtime::Runtime::new()?;

    rt.block_on(async {
        let config = Config::default();
        // Example of customization:
        // let config = Config::default()
        //     .with_web(rs_gearbox::WebConfig::default()
        //         .with_port(3000)
        //         .with_index_path("ui/page.html"));

        let web_config = WebServerConfig::from_config(&config.web);

        println!("=================================");
        println!("  rs-gearbox Web Server");
        println!("=================================");
        println!();
        println!("  Web UI: http://{}", web_config.addr);
        println!("  API:    http://{}/step?accelerate=1", web_config.addr);
        println!();
        println!("Press Ctrl+C to stop.");
        println!();

        let gearbox = Arc::new(SharedGearbox::new());
        run_server(gearbox, web_config).await?;
        Ok(())
    })
}
