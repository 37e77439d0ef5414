// =====================================================================================
// NAMING HELPERS
// =====================================================================================

use std::sync::OnceLock;

use regex::Regex;

const MAX_DASHBOARD_NAME_LEN: usize = 255;
const MAX_ALARM_NAME_LEN: usize = 255;

fn account_id_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[0-9]{12}$").ok()).as_ref()
}

fn dashboard_name_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"[^A-Za-z0-9_\-]+").ok()).as_ref()
}

/// Twelve decimal digits, nothing else.
pub fn is_valid_account_id(account_id: &str) -> bool {
    account_id_pattern().is_some_and(|pattern| pattern.is_match(account_id))
}

/// Dashboard names only allow alphanumerics, `-` and `_`.
pub fn sanitize_dashboard_name(raw: &str) -> String {
    let cleaned = match dashboard_name_pattern() {
        Some(pattern) => pattern.replace_all(raw.trim(), "-").into_owned(),
        None => raw.trim().to_string(),
    };
    let cleaned = cleaned.trim_matches('-');
    cleaned.chars().take(MAX_DASHBOARD_NAME_LEN).collect()
}

pub fn default_dashboard_name(app_name: &str, environment: &str) -> String {
    sanitize_dashboard_name(&format!("{}-{}-dashboard", app_name, environment))
}

/// Alarm identity is (resource kind, metric name, ordinal) so that two resources
/// of the same kind emitting identically-named alarms never collide.
pub fn alarm_identity(kind_tag: &str, metric_name: &str, ordinal: usize) -> String {
    format!("{}-{}-{}", kind_tag, metric_name, ordinal)
}

pub fn alarm_name(prefix: &str, identity: &str) -> String {
    format!("{}-{}", prefix, identity)
        .chars()
        .take(MAX_ALARM_NAME_LEN)
        .collect()
}

pub fn dashboard_url(region: &str, dashboard_name: &str) -> String {
    format!(
        "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#dashboards:name={name}",
        region = region,
        name = dashboard_name
    )
}
