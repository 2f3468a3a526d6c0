/// Environment variable names used by this crate for convenient
/// configuration of the dispatcher and logging from a host process.
///
/// These are purely helpers; the builder and dispatcher never read the
/// environment on their own.

/// Manifest version written when a Kubernetes event carries none.
pub const CW_OTLP_DEFAULT_MANIFEST_VERSION_ENV: &str = "CW_OTLP_DEFAULT_MANIFEST_VERSION";

/// Maximum number of entries appended to one document before a new one is opened.
pub const CW_OTLP_MAX_ENTRIES_PER_DOCUMENT_ENV: &str = "CW_OTLP_MAX_ENTRIES_PER_DOCUMENT";

/// `tracing` filter directive used when `RUST_LOG` is unset, e.g. `info`.
pub const CW_OTLP_LOG_FILTER_ENV: &str = "CW_OTLP_LOG_FILTER";

/// Set to `true`, `1` or `yes` to emit JSON formatted diagnostics.
pub const CW_OTLP_LOG_JSON_ENV: &str = "CW_OTLP_LOG_JSON";

/// Read an environment variable or fall back to a provided default.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Read and parse an environment variable, falling back to `default` when
/// it is unset or does not parse.
pub fn env_parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Interpret `true`/`1`/`yes` (case-insensitive) as enabled.
pub fn env_flag(key: &str) -> bool {
    matches!(
        env_or(key, "").trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
