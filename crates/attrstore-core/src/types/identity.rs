use serde::{Deserialize, Serialize};

/// Verification state of the DKIM DNS records published for a domain
/// identity.
///
/// The service may grow new states; those arrive as
/// [`DkimVerificationStatus::Unrecognized`] instead of failing
/// deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DkimVerificationStatus {
    /// Token detection is underway
    Pending,
    /// Tokens were found in DNS and signing is possible
    Success,
    /// Token detection failed permanently
    Failed,
    /// Token detection failed but will be retried
    TemporaryFailure,
    /// Verification was never requested
    NotStarted,
    /// A status string this client version does not know
    Unrecognized(String),
}

impl DkimVerificationStatus {
    /// The wire representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::Success => "Success",
            Self::Failed => "Failed",
            Self::TemporaryFailure => "TemporaryFailure",
            Self::NotStarted => "NotStarted",
            Self::Unrecognized(s) => s,
        }
    }

    /// Returns true if DKIM signing is possible for the identity.
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<String> for DkimVerificationStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "Pending" => Self::Pending,
            "Success" => Self::Success,
            "Failed" => Self::Failed,
            "TemporaryFailure" => Self::TemporaryFailure,
            "NotStarted" => Self::NotStarted,
            _ => Self::Unrecognized(s),
        }
    }
}

impl From<DkimVerificationStatus> for String {
    fn from(status: DkimVerificationStatus) -> Self {
        status.as_str().to_string()
    }
}

impl std::fmt::Display for DkimVerificationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// DKIM attributes of a verified email address or domain identity.
///
/// Every field is independently optional; an absent field means the service
/// did not report it, which is distinct from any set value. For domain
/// identities the tokens are the labels of CNAME records the owner must
/// publish in DNS; detection of those records drives
/// [`dkim_verification_status`](Self::dkim_verification_status).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityDkimAttributes {
    /// Whether DKIM signing is enabled for mail sent from the identity
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dkim_enabled: Option<bool>,

    /// Verification state of the published DKIM DNS records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dkim_verification_status: Option<DkimVerificationStatus>,

    /// DNS CNAME target tokens for the identity.
    ///
    /// `None` means the service did not report tokens; `Some(vec![])` means
    /// it reported an explicitly empty set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dkim_tokens: Option<Vec<String>>,
}

impl IdentityDkimAttributes {
    /// An all-absent record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The tokens, or an empty slice when the field is absent.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        self.dkim_tokens.as_deref().unwrap_or_default()
    }

    /// Set whether DKIM signing is enabled.
    #[must_use]
    pub const fn with_dkim_enabled(mut self, enabled: bool) -> Self {
        self.dkim_enabled = Some(enabled);
        self
    }

    /// Set the verification status.
    #[must_use]
    pub fn with_verification_status(mut self, status: DkimVerificationStatus) -> Self {
        self.dkim_verification_status = Some(status);
        self
    }

    /// Replace the token set.
    #[must_use]
    pub fn with_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dkim_tokens = Some(tokens.into_iter().map(Into::into).collect());
        self
    }

    /// Append one token, keeping any previously set tokens in order.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.dkim_tokens
            .get_or_insert_with(Vec::new)
            .push(token.into());
        self
    }
}
