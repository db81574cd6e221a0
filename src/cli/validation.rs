use crate::cli::args::CliArgs;

pub fn validate(args: &CliArgs) -> Result<(), String> {
    if let Some(url) = args.url.as_deref() {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(format!("invalid --url '{url}', expected an http(s):// prefix"));
        }
    }
    if let Some(ua) = args.user_agent.as_deref() {
        if ua.trim().is_empty() {
            return Err("invalid --user-agent, expected a non-empty value".to_string());
        }
    }
    Ok(())
}
