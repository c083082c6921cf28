use std::{env, env::VarError};

/// The server takes no command-line arguments; any argument at all gets the help text and the
/// current configuration, and the caller should then exit instead of starting the server.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_help();
        display_envs();
    }
    has_cli_args
}

fn display_help() {
    const HELP: &str = include_str!("./cli-help.txt");
    println!("\n{HELP}\n");
}

fn display_envs() {
    // An allowlist, never a dump of the whole environment. CBS_JWT_SECRET and
    // CBS_GATEWAY_SECRET_KEY must stay out of this list.
    const DISPLAY_ENVS: [&str; 7] = [
        "RUST_LOG",
        "CBS_HOST",
        "CBS_PORT",
        "CBS_DATABASE_URL",
        "CBS_JWT_TTL_SECONDS",
        "CBS_GATEWAY_URL",
        "CBS_GATEWAY_TIMEOUT_SECONDS",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
