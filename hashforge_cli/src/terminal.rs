//! Terminal detection

use is_terminal::IsTerminal;
use std::env;
use std::io::{stderr, stdin, stdout};

/// Check if stdout is connected to an interactive terminal
pub fn is_interactive() -> bool {
    if !stdout().is_terminal() {
        return false;
    }

    // CI runners often allocate a TTY
    if is_ci_environment() {
        return false;
    }

    env::var("DEBIAN_FRONTEND").unwrap_or_default() != "noninteractive"
}

/// Check if the terminal supports ANSI escape codes for colors and progress bars
pub fn supports_ansi() -> bool {
    if !is_interactive() {
        return false;
    }

    if env::var_os("NO_COLOR").is_some() {
        return false;
    }

    let term = env::var("TERM").unwrap_or_default();
    if cfg!(windows) {
        term != "dumb"
    } else {
        !(term == "dumb" || term.is_empty())
    }
}

/// Check if stderr is connected to a terminal (for progress display)
pub fn stderr_is_terminal() -> bool {
    stderr().is_terminal()
}

/// True when nothing is piped into the process
pub fn stdin_is_terminal() -> bool {
    stdin().is_terminal()
}

/// Detect if running in a CI environment
fn is_ci_environment() -> bool {
    const CI_VARS: [&str; 8] = [
        "CI",
        "CONTINUOUS_INTEGRATION",
        "GITHUB_ACTIONS",
        "GITLAB_CI",
        "BUILDKITE",
        "CIRCLECI",
        "JENKINS_URL",
        "TF_BUILD",
    ];

    CI_VARS.iter().any(|var| env::var_os(var).is_some())
}

/// Progress bars go to stderr and need an ANSI-capable interactive terminal
pub fn should_show_progress_by_default() -> bool {
    is_interactive() && stderr_is_terminal() && supports_ansi()
}
