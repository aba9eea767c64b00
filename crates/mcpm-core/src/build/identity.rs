//! Server name derivation from the install layout.

use std::path::Path;

use super::LaunchSpec;

/// Name used when neither the layout nor the command yields one.
pub const FALLBACK_SERVER_NAME: &str = "mcp-server";

const SERVERS_SEGMENT: &str = "servers";

/// Derive the name a server is registered under.
///
/// Looks for `.../servers/<name>/...` in the first argument (the layout the
/// fetcher clones into), falling back to the base name of the command.
pub fn server_identity(spec: &LaunchSpec) -> String {
    if let Some(name) = spec.args().first().and_then(|arg| name_from_layout(arg)) {
        return name;
    }
    Path::new(spec.command())
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .filter(|name| !name.is_empty() && name.as_str() != ".")
        .unwrap_or_else(|| FALLBACK_SERVER_NAME.to_string())
}

fn name_from_layout(path: &str) -> Option<String> {
    let mut segments = path.split(is_separator);
    while let Some(segment) = segments.next() {
        if segment == SERVERS_SEGMENT {
            return segments
                .next()
                .filter(|name| !name.is_empty() && *name != ".")
                .map(str::to_string);
        }
    }
    None
}

fn is_separator(c: char) -> bool {
    c == '/' || c == std::path::MAIN_SEPARATOR
}
