pub fn parse_timeout_seconds(value: &str) -> Result<f64, String> {
    let trimmed = value.trim();
    let secs: f64 = trimmed
        .parse()
        .map_err(|_| format!("timeout must be a number, not '{trimmed}'"))?;
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("timeout must be a positive number, not '{trimmed}'"));
    }
    Ok(secs)
}

/// Reads a wordlist preserving line order. Lines are trimmed but blank lines
/// are kept: the login form is still submitted for them.
pub async fn load_candidates(path: &str) -> Result<Vec<String>, std::io::Error> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(contents.lines().map(|l| l.trim().to_string()).collect())
}
