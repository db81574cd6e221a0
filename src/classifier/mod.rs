use regex::Regex;

/// Marker WordPress puts in the login error box when the test cookie was not
/// sent back. Matched case-insensitively over collapsed whitespace.
pub const BLOCKED_MARKER: &str = "cookies are blocked";

const INVALID_USERNAME_MARKERS: &[&str] = &["invalid username", "unknown username"];
const INVALID_PASSWORD_MARKERS: &[&str] = &["incorrect password", "the password you entered"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CredentialField {
    Username,
    Password,
}

impl CredentialField {
    pub fn label(&self) -> &'static str {
        match self {
            CredentialField::Username => "Username",
            CredentialField::Password => "Password",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            CredentialField::Username => "usernames",
            CredentialField::Password => "passwords",
        }
    }

    /// Value submitted for the credential field that is held constant while
    /// the other one varies.
    pub fn default_fixed_value(&self) -> &'static str {
        match self {
            CredentialField::Username => "hi mom",
            CredentialField::Password => "admin",
        }
    }

    fn invalid_markers(&self) -> &'static [&'static str] {
        match self {
            CredentialField::Username => INVALID_USERNAME_MARKERS,
            CredentialField::Password => INVALID_PASSWORD_MARKERS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// No login error box in the body. Absence of the error indicator is the
    /// only success signal the login page gives us.
    Success,
    Blocked,
    InvalidCredential,
    /// The error box is present but matches no known marker. The attempt loop
    /// logs the message and treats it like an invalid credential.
    Unrecognized(String),
}

pub struct Classifier {
    error_re: Regex,
    tag_re: Regex,
    field: CredentialField,
}

impl Classifier {
    pub fn new(field: CredentialField) -> Self {
        let error_re =
            Regex::new(r#"(?is)<div[^>]*\bid\s*=\s*["']?login_error["']?[^>]*>(.*?)</div>"#)
                .unwrap();
        let tag_re = Regex::new(r"<[^>]+>").unwrap();
        Self {
            error_re,
            tag_re,
            field,
        }
    }

    /// Pure classification of a login response body. Calling it twice on the
    /// same body yields the same outcome.
    pub fn classify(&self, body: &str) -> Outcome {
        let Some(indicator) = self.login_error_text(body) else {
            return Outcome::Success;
        };
        let normalized = normalize(&indicator);
        if normalized.contains(BLOCKED_MARKER) {
            return Outcome::Blocked;
        }
        if self
            .field
            .invalid_markers()
            .iter()
            .any(|marker| normalized.contains(marker))
        {
            return Outcome::InvalidCredential;
        }
        Outcome::Unrecognized(normalized)
    }

    /// Extracts the text of the login error box, with inner markup stripped.
    pub fn login_error_text(&self, body: &str) -> Option<String> {
        let caps = self.error_re.captures(body)?;
        let inner = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        Some(self.tag_re.replace_all(inner, " ").to_string())
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
