mod args;

pub(crate) use args::{CliArgs, LogLevelArg, parse_cli};
