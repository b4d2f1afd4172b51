//! Query-string parsing helpers for the HTTP adapter.
//!
//! The wire protocol encodes the two driving stimuli as query parameters
//! (`/step?accelerate=1&brake=0`). A parameter is truthy when it is present
//! with an `=` whose first following character is `1`, `t`, `T`, `y`, or
//! `Y`; an absent parameter or any other value is false.
//!
//! These helpers are dependency-free so the adapter-facing parsing can be
//! unit-tested without the web stack.

/// Parse a truthy flag parameter out of a raw query string.
///
/// `query` is the portion after `?`, without URL decoding (the protocol only
/// ever carries ASCII flag values). Returns `false` for a missing query,
/// missing parameter, missing `=`, or a non-truthy first value character.
///
/// # Example
///
/// ```rust
/// use rs_gearbox::parsing::parse_flag_param;
///
/// assert!(parse_flag_param(Some("accelerate=1&brake=0"), "accelerate"));
/// assert!(!parse_flag_param(Some("accelerate=1&brake=0"), "brake"));
/// assert!(!parse_flag_param(None, "accelerate"));
/// ```
pub fn parse_flag_param(query: Option<&str>, name: &str) -> bool {
    let Some(query) = query else {
        return false;
    };
    let Some(pos) = query.find(name) else {
        return false;
    };

    let rest = &query[pos + name.len()..];
    let Some(value) = rest.strip_prefix('=') else {
        return false;
    };

    matches!(value.bytes().next(), Some(b'1' | b't' | b'T' | b'y' | b'Y'))
}
