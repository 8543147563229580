/// Get environment variable with SUBSYNC_ prefix, falling back to the
/// unprefixed name.
///
/// Checks `SUBSYNC_{key}` first, then `{key}`, for compatibility with
/// standard environment variable naming on hosting platforms.
///
/// # Examples
///
/// ```rust
/// use subsync::utils::get_env_with_prefix;
///
/// // Checks SUBSYNC_PORT first, then PORT
/// let port = get_env_with_prefix("PORT");
/// ```
pub fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("SUBSYNC_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
