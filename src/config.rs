//! Shared configuration for the web and console adapters.
//!
//! Uses `heapless::String` for string fields so the config types stay
//! `no_std`-compatible while remaining ergonomic on desktop.
//!
//! The simulation constants themselves (rates, windows, margin) are fixed
//! and live in [`crate::gearbox`]; configuration covers only the adapters.
//!
//! # Example
//!
//! ```rust
//! use rs_gearbox::config::{Config, WebConfig};
//!
//! // Use defaults
//! let config = Config::default();
//!
//! // Or customize
//! let config = Config::default().with_web(WebConfig::default().with_port(3000));
//! ```

use heapless::String as HString;

/// Maximum length for config path strings
pub const MAX_PATH_STRING: usize = 128;

/// Type alias for path config strings
pub type PathString = HString<MAX_PATH_STRING>;

/// Create a PathString from a &str, truncating at a UTF-8 boundary if too long
pub fn path_string(s: &str) -> PathString {
    let mut hs = PathString::new();
    // Keep only chars that end at or before the cap, so a multibyte char
    // straddling the boundary is dropped rather than overflowing the push.
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= MAX_PATH_STRING)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete application configuration
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Web server configuration
    pub web: WebConfig,
    /// Terminal front end configuration
    pub console: ConsoleConfig,
}

impl Config {
    /// Set web configuration
    pub fn with_web(mut self, web: WebConfig) -> Self {
        self.web = web;
        self
    }

    /// Set console configuration
    pub fn with_console(mut self, console: ConsoleConfig) -> Self {
        self.console = console;
        self
    }
}

// ============================================================================
// Web Config
// ============================================================================

/// Web server configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WebConfig {
    /// HTTP server port
    pub port: u16,
    /// Path of the HTML page served at `/`, read from disk per request
    pub index_path: PathString,
    /// Whether to allow all CORS origins (for browser clients)
    pub cors_permissive: bool,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            index_path: path_string("www/index.html"),
            cors_permissive: true,
        }
    }
}

impl WebConfig {
    /// Set the server port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the index page path
    pub fn with_index_path(mut self, path: &str) -> Self {
        self.index_path = path_string(path);
        self
    }

    /// Set whether CORS should be permissive
    pub fn with_cors(mut self, permissive: bool) -> Self {
        self.cors_permissive = permissive;
        self
    }
}

// ============================================================================
// Console Config
// ============================================================================

/// Terminal front end configuration
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConsoleConfig {
    /// Tick interval in milliseconds; the simulation steps by tick_ms/1000
    /// seconds each frame
    pub tick_ms: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self { tick_ms: 60 }
    }
}

impl ConsoleConfig {
    /// Set the tick interval in milliseconds
    pub fn with_tick_ms(mut self, tick_ms: u64) -> Self {
        self.tick_ms = tick_ms;
        self
    }

    /// Tick duration as seconds, for passing to the engine
    pub fn tick_seconds(&self) -> f64 {
        self.tick_ms as f64 / 1000.0
    }
}
