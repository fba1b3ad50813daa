use std::path::PathBuf;

use clap::{ArgAction, ColorChoice, Parser};

use super::options::LogLevelArg;
use super::styles::{cli_styles, long_version};

/// Command-line arguments accepted by the `sharetree` binary.
#[derive(Parser, Debug)]
#[command(
    name = "sharetree",
    version,
    long_version = long_version(),
    about = "Browse and search remote file shares from the terminal",
    color = ColorChoice::Auto,
    styles = cli_styles()
)]
pub(crate) struct CliArgs {
    #[arg(
        short,
        long = "config",
        value_name = "FILE",
        env = "SHARETREE_CONFIG",
        action = ArgAction::Append,
        help = "Additional configuration file to merge (default: none)"
    )]
    pub(crate) config: Vec<PathBuf>,
    #[arg(
        short = 'n',
        long = "no-config",
        help = "Skip loading default configuration files (default: disabled)"
    )]
    pub(crate) no_config: bool,
    #[arg(
        short = 's',
        long,
        value_name = "URL",
        help = "Base URL of the share backend (default: http://127.0.0.1:5000)"
    )]
    pub(crate) server: Option<String>,
    #[arg(
        long,
        value_name = "HOST",
        conflicts_with = "location",
        help = "File server to list shares from (default: none)"
    )]
    pub(crate) host: Option<String>,
    #[arg(
        short = 'u',
        long,
        value_name = "USER",
        help = "User name for the file server (default: none)"
    )]
    pub(crate) user: Option<String>,
    #[arg(
        long,
        value_name = "PASSWORD",
        env = "SHARETREE_PASSWORD",
        hide_env_values = true,
        help = "Password for the file server (default: none)"
    )]
    pub(crate) password: Option<String>,
    #[arg(
        short = 'L',
        long,
        value_name = "UNC",
        help = r"Open a share by location, e.g. \\server\share (default: none)"
    )]
    pub(crate) location: Option<String>,
    #[arg(
        long = "timeout",
        value_name = "SECS",
        help = "Transport timeout for backend requests in seconds (default: none)"
    )]
    pub(crate) timeout_secs: Option<u64>,
    #[arg(
        long = "search-limit",
        value_name = "NUM",
        help = "Maximum number of search results to request (default: 500)"
    )]
    pub(crate) search_limit: Option<usize>,
    #[arg(
        long = "no-index",
        help = "Do not build the search index after connecting (default: disabled)"
    )]
    pub(crate) no_index: bool,
    #[arg(
        short = 'q',
        long = "query",
        value_name = "QUERY",
        help = "Provide an initial search query (default: empty)"
    )]
    pub(crate) initial_query: Option<String>,
    #[arg(
        short = 'r',
        long,
        value_name = "PATH",
        help = "Reveal a path below the first share after connecting (default: none)"
    )]
    pub(crate) reveal: Option<String>,
    #[arg(
        long = "log-level",
        value_enum,
        help = "Minimum level shown in the log pane (default: info)"
    )]
    pub(crate) log_level: Option<LogLevelArg>,
    #[arg(
        short = 'p',
        long = "print-config",
        help = "Print the resolved configuration before running (default: disabled)"
    )]
    pub(crate) print_config: bool,
}
