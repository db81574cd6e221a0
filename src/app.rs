use clap::{error::ErrorKind, CommandFactory, Parser};
use colored::Colorize;

use crate::classifier::CredentialField;
use crate::cli::args::CliArgs;
use crate::cli::validation;
use crate::config::{self, ConfigFile};
use crate::probe;
use crate::runner::{Options, RunResult, Runner, RunnerError, WordlistSource};

fn print_banner(field: CredentialField) {
    const BANNER: &str = r#"
                __               __
 _      ______ / /_  _______  __/ /____
| | /| / / __ \/ __ \/ ___/ / / / __/ _ \
| |/ |/ / /_/ / /_/ / /  / /_/ / /_/  __/
|__/|__/ .___/_.___/_/   \__,_/\__/\___/
      /_/
       v0.2.1 - WordPress login prober
    "#;
    print!("{}", BANNER);
    println!();
    println!(
        "{}{}{} {}",
        "[".bold().white(),
        "WRN".bold().yellow(),
        "]".bold().white(),
        "Use only against targets you are authorized to test."
            .bold()
            .white()
    );
    println!(
        "{}{}{} {} {}\n",
        "[".bold().white(),
        "MOD".bold().green(),
        "]".bold().white(),
        "Field under test:".bold().white(),
        field.label().to_lowercase().bold().cyan()
    );
}

fn format_kv_line(label: &str, value: &str) {
    println!(":: {:<8}: {}", label, value);
}

fn build_options(
    args: CliArgs,
    cfg: ConfigFile,
    field: CredentialField,
) -> Result<(Options, bool), String> {
    let url = args
        .url
        .or(cfg.url)
        .ok_or_else(|| "no target url provided, use -u/--url".to_string())?;
    let wordlist = args
        .wordlist
        .or(cfg.wordlist)
        .ok_or_else(|| "no wordlist provided, use -w/--wordlist".to_string())?;
    let timeout = args
        .timeout
        .or_else(|| cfg.timeout.map(|t| t.to_string()))
        .unwrap_or_else(|| "5".to_string());
    let no_color = args.no_color || cfg.no_color.unwrap_or(false);

    let options = Options {
        url,
        wordlist: WordlistSource::FilePath(config::expand_tilde_string(&wordlist)),
        timeout,
        field,
        fixed_value: args.fixed.or(cfg.fixed),
        user_agent: args
            .user_agent
            .or(cfg.user_agent)
            .unwrap_or_else(|| probe::DEFAULT_USER_AGENT.to_string()),
    };
    Ok((options, no_color))
}

fn report(field: CredentialField, result: Result<RunResult, RunnerError>) -> i32 {
    match result {
        Ok(RunResult::Found(value)) => {
            println!(
                "{} {} {}",
                field.label().bold().white(),
                "->".bold().white(),
                value.bold().green()
            );
            0
        }
        Ok(RunResult::Exhausted { blocked: true }) => {
            println!(
                "{}",
                "The target rejected our session cookies, the login form cannot be probed."
                    .bold()
                    .red()
            );
            2
        }
        Ok(RunResult::Exhausted { blocked: false }) => {
            println!("None of the {} worked, sorry.", field.plural());
            1
        }
        Err(e) => {
            println!("{e}");
            1
        }
    }
}

pub fn run_cli(field: CredentialField) -> Result<i32, String> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp => {
                let mut cmd = CliArgs::command();
                let _ = cmd.print_help();
                return Ok(0);
            }
            ErrorKind::DisplayVersion => {
                let cmd = CliArgs::command();
                print!("{}", cmd.render_version());
                return Ok(0);
            }
            _ => return Err(e.to_string()),
        },
    };

    validation::validate(&args)?;

    let user_config_path = args.config.clone().map(|p| config::expand_tilde(&p));
    let cfg = match user_config_path.as_ref() {
        Some(path) => config::load_config(path, false)?,
        None => match config::default_config_path() {
            Some(path) => config::load_config(&path, true)?,
            None => ConfigFile::default(),
        },
    };

    let (options, no_color) = build_options(args, cfg, field)?;
    if no_color {
        colored::control::set_override(false);
    }

    print_banner(field);
    format_kv_line("Site", &options.url);
    if let WordlistSource::FilePath(path) = &options.wordlist {
        format_kv_line("Wordlist", path);
    }
    format_kv_line("Timeout", &options.timeout);
    println!();

    let runner = Runner::new(options).map_err(|e| e.to_string())?;

    // the attempt loop is deliberately sequential, one runtime thread is enough
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| format!("failed to build runtime: {e}"))?;

    let result = rt.block_on(runner.run());
    Ok(report(field, result))
}
