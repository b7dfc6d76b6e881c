/// Default base URL for OpenRouter requests.
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/";

/// Path of the responses endpoint relative to the base URL.
pub const RESPONSES_PATH: &str = "/api/v1/responses";

/// Join a base URL and an endpoint path.
///
/// Normalization rules:
/// 1) an empty base falls back to [`DEFAULT_BASE_URL`]
/// 2) trailing slashes on the base and leading slashes on the path collapse to one `/`
/// 3) an empty path returns the trimmed base unchanged
pub fn resolve_endpoint(base: &str, path: &str) -> String {
    let base = if base.trim().is_empty() {
        DEFAULT_BASE_URL
    } else {
        base.trim()
    };

    let trimmed = base.trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');
    if path.is_empty() {
        return trimmed.to_string();
    }
    format!("{trimmed}/{path}")
}
