use sharetree_remote_api::ConnectionContext;

use super::ResolvedConfig;

pub(super) fn print_summary(config: &ResolvedConfig) {
    println!("Effective configuration:");
    println!("  Server: {}", config.server);
    match &config.context {
        ConnectionContext::Location(location) => println!("  Location: {location}"),
        ConnectionContext::Host { host, credentials } => {
            println!("  Host: {host}");
            if !credentials.user.is_empty() {
                println!("  User: {}", credentials.user);
            }
            println!(
                "  Password: {}",
                if credentials.password.is_empty() { "(none)" } else { "(set)" }
            );
        }
    }
    match config.timeout {
        Some(timeout) => println!("  Timeout: {}s", timeout.as_secs()),
        None => println!("  Timeout: none"),
    }
    println!("  Search limit: {}", config.browser.search_limit);
    println!(
        "  Search debounce: {}ms indexed, {}ms live",
        config.browser.debounce_indexed.as_millis(),
        config.browser.debounce_live.as_millis()
    );
    println!("  Build index: {}", bool_to_word(config.browser.auto_index));
    println!(
        "  Index poll interval: {}ms",
        config.browser.poll_interval.as_millis()
    );
    println!("  Log level: {}", config.log_level);
    if let Some(query) = &config.initial_query {
        println!("  Initial query: {query}");
    }
    if let Some(path) = &config.reveal {
        println!("  Reveal: {path}");
    }
}

fn bool_to_word(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
