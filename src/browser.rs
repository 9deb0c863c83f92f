use std::process::{Command, Stdio};
use tracing::{trace, warn};

const NO_ARGS: &[&str] = &[];
const WINDOWS_ARGS: &[&str] = &["url.dll,FileProtocolHandler"];

/// Returns the program and leading arguments that open a URL on this OS.
pub fn opener_command() -> Option<(&'static str, &'static [&'static str])> {
    if cfg!(target_os = "macos") {
        Some(("open", NO_ARGS))
    } else if cfg!(target_os = "windows") {
        Some(("rundll32", WINDOWS_ARGS))
    } else if cfg!(target_os = "linux") {
        Some(("xdg-open", NO_ARGS))
    } else {
        None
    }
}

/// Launches the system browser at `url` without waiting for it.
///
/// Failures are only logged: the caller always prints the URL as a fallback.
pub fn open(url: &str) {
    let Some((program, args)) = opener_command() else {
        warn!("No known browser opener for this platform");
        return;
    };

    trace!("Opening browser with {}...", program);
    let spawned = Command::new(program)
        .args(args)
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    if let Err(e) = spawned {
        warn!("Failed to launch {}: {}", program, e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opener_matches_platform() {
        let opener = opener_command();
        if cfg!(target_os = "linux") {
            assert_eq!(opener, Some(("xdg-open", NO_ARGS)));
        } else if cfg!(target_os = "macos") {
            assert_eq!(opener, Some(("open", NO_ARGS)));
        } else if cfg!(target_os = "windows") {
            assert_eq!(opener, Some(("rundll32", WINDOWS_ARGS)));
        }
    }
}
