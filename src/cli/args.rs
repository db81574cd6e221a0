use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(
    version,
    about = "WordPress login credential probing tool",
    long_about = "Probes a WordPress login form by submitting candidates from a wordlist and classifying each response.\n\nExamples:\n  wpbruteuser -u https://target.tld -w ./usernames.txt\n  wpbrutepass -u https://target.tld -w ./passwords.txt --fixed admin -t 10\n\nUse only against targets you are authorized to test."
)]
pub struct CliArgs {
    #[arg(
        short = 'u',
        long = "url",
        value_name = "URL",
        help_heading = "Input",
        help = "Target site URL, prefixed with http(s):// (required)."
    )]
    pub url: Option<String>,

    #[arg(
        short = 'w',
        long = "wordlist",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to the newline-delimited candidate wordlist (required)."
    )]
    pub wordlist: Option<String>,

    #[arg(
        short = 't',
        long = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds (default: 5)."
    )]
    pub timeout: Option<String>,

    #[arg(
        long = "fixed",
        value_name = "VALUE",
        help_heading = "Input",
        help = "Value for the credential field that is held constant while the other varies."
    )]
    pub fixed: Option<String>,

    #[arg(
        short = 'A',
        long = "user-agent",
        value_name = "UA",
        help_heading = "HTTP",
        help = "User-Agent header sent with every request."
    )]
    pub user_agent: Option<String>,

    #[arg(
        short = 'C',
        long = "config",
        value_name = "FILE",
        help_heading = "Input",
        help = "Path to config file (defaults to ~/.wpbrute/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        short = 'n',
        long = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,
}
