use simplelog::LevelFilter;

/// Reads a log level from the environment variable `var`, defaulting to `INFO`
pub fn get_log_level(var: &str) -> LevelFilter {
    parse_log_level(&std::env::var(var).unwrap_or_default())
}

fn parse_log_level(level: &str) -> LevelFilter {
    match level.to_ascii_uppercase().as_str() {
        "TRACE" => LevelFilter::Trace,
        "DEBUG" => LevelFilter::Debug,
        "WARN" => LevelFilter::Warn,
        "ERROR" => LevelFilter::Error,
        "OFF" => LevelFilter::Off,

        // default
        _ => LevelFilter::Info,
    }
}
