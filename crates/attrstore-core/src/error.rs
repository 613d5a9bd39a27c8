use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur when talking to the attribute store.
///
/// Service-side variants correspond one-to-one to the error codes the store
/// returns; client-side variants never carry a server-assigned code.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The named domain does not exist
    #[error("no such domain: {domain}")]
    NoSuchDomain {
        /// Domain name from the failing request
        domain: String,
    },

    /// A parameter value was rejected by the service
    #[error("invalid parameter value: {0}")]
    InvalidParameterValue(String),

    /// A required parameter was not supplied
    #[error("missing parameter: {0}")]
    MissingParameter(String),

    /// The select expression could not be parsed
    #[error("invalid query expression: {0}")]
    InvalidQueryExpression(String),

    /// The pagination token was not recognized
    #[error("invalid next token")]
    InvalidNextToken,

    /// Too many predicates in a select expression
    #[error("too many predicates in query expression")]
    InvalidNumberPredicates,

    /// Too many value tests against a single attribute
    #[error("too many value tests per predicate")]
    InvalidNumberValueTests,

    /// More attributes requested than the service allows
    #[error("too many attributes requested")]
    TooManyRequestedAttributes,

    /// The service gave up on the request
    #[error("request timed out on the service side")]
    RequestTimeout,

    /// An expected attribute was not present
    #[error("attribute does not exist: {0}")]
    AttributeDoesNotExist(String),

    /// A batch contained the same item name twice
    #[error("duplicate item name in batch: {0}")]
    DuplicateItemName(String),

    /// Domain quota for the account is exhausted
    #[error("number of domains exceeded the account limit")]
    NumberDomainsExceeded,

    /// Domain-wide attribute count limit reached
    #[error("number of attributes in the domain exceeded the limit")]
    NumberDomainAttributesExceeded,

    /// Domain-wide storage limit reached
    #[error("domain storage size exceeded the limit")]
    NumberDomainBytesExceeded,

    /// Per-item attribute pair limit reached
    #[error("number of attributes on the item exceeded the limit")]
    NumberItemAttributesExceeded,

    /// Too many items in a single batch put
    #[error("number of items in the batch exceeded the limit")]
    NumberSubmittedItemsExceeded,

    /// Too many attributes across a single batch put
    #[error("number of attributes in the batch exceeded the limit")]
    NumberSubmittedAttributesExceeded,

    /// The service is throttling or temporarily unavailable
    #[error("service unavailable, retry after {retry_after:?} seconds")]
    ServiceUnavailable {
        /// Seconds to wait before retrying
        retry_after: Option<u64>,
    },

    /// Service error with a code this client does not know
    #[error("service error ({code}): {message}")]
    Service {
        /// Error code as returned on the wire
        code: String,
        /// Error message from the service
        message: String,
    },

    /// HTTP request failed before a service response was received
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// JSON parsing/serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The configured endpoint is not a usable URL
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl StoreError {
    /// Map a wire error code to the matching variant.
    ///
    /// Unknown codes are preserved verbatim in [`StoreError::Service`] so
    /// callers can still distinguish them.
    #[must_use]
    pub fn from_service_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code {
            "NoSuchDomain" => Self::NoSuchDomain { domain: message },
            "InvalidParameterValue" => Self::InvalidParameterValue(message),
            "MissingParameter" => Self::MissingParameter(message),
            "InvalidQueryExpression" => Self::InvalidQueryExpression(message),
            "InvalidNextToken" => Self::InvalidNextToken,
            "InvalidNumberPredicates" => Self::InvalidNumberPredicates,
            "InvalidNumberValueTests" => Self::InvalidNumberValueTests,
            "TooManyRequestedAttributes" => Self::TooManyRequestedAttributes,
            "RequestTimeout" => Self::RequestTimeout,
            "AttributeDoesNotExist" => Self::AttributeDoesNotExist(message),
            "DuplicateItemName" => Self::DuplicateItemName(message),
            "NumberDomainsExceeded" => Self::NumberDomainsExceeded,
            "NumberDomainAttributesExceeded" => Self::NumberDomainAttributesExceeded,
            "NumberDomainBytesExceeded" => Self::NumberDomainBytesExceeded,
            "NumberItemAttributesExceeded" => Self::NumberItemAttributesExceeded,
            "NumberSubmittedItemsExceeded" => Self::NumberSubmittedItemsExceeded,
            "NumberSubmittedAttributesExceeded" => Self::NumberSubmittedAttributesExceeded,
            "ServiceUnavailable" => Self::ServiceUnavailable { retry_after: None },
            _ => Self::Service {
                code: code.to_string(),
                message,
            },
        }
    }

    /// Returns the wire error code for service-side errors.
    #[must_use]
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::NoSuchDomain { .. } => Some("NoSuchDomain"),
            Self::InvalidParameterValue(_) => Some("InvalidParameterValue"),
            Self::MissingParameter(_) => Some("MissingParameter"),
            Self::InvalidQueryExpression(_) => Some("InvalidQueryExpression"),
            Self::InvalidNextToken => Some("InvalidNextToken"),
            Self::InvalidNumberPredicates => Some("InvalidNumberPredicates"),
            Self::InvalidNumberValueTests => Some("InvalidNumberValueTests"),
            Self::TooManyRequestedAttributes => Some("TooManyRequestedAttributes"),
            Self::RequestTimeout => Some("RequestTimeout"),
            Self::AttributeDoesNotExist(_) => Some("AttributeDoesNotExist"),
            Self::DuplicateItemName(_) => Some("DuplicateItemName"),
            Self::NumberDomainsExceeded => Some("NumberDomainsExceeded"),
            Self::NumberDomainAttributesExceeded => Some("NumberDomainAttributesExceeded"),
            Self::NumberDomainBytesExceeded => Some("NumberDomainBytesExceeded"),
            Self::NumberItemAttributesExceeded => Some("NumberItemAttributesExceeded"),
            Self::NumberSubmittedItemsExceeded => Some("NumberSubmittedItemsExceeded"),
            Self::NumberSubmittedAttributesExceeded => Some("NumberSubmittedAttributesExceeded"),
            Self::ServiceUnavailable { .. } => Some("ServiceUnavailable"),
            Self::Service { code, .. } => Some(code),
            Self::Http(_) | Self::Json(_) | Self::InvalidEndpoint(_) => None,
        }
    }

    /// Returns true if the error is safe to retry as-is.
    ///
    /// Nothing in this crate retries; the flag exists for an outer retry
    /// layer to act on.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ServiceUnavailable { .. } | Self::RequestTimeout
        )
    }

    /// Returns true if the error originated on the service side.
    #[must_use]
    pub const fn is_service_error(&self) -> bool {
        !matches!(self, Self::Http(_) | Self::Json(_) | Self::InvalidEndpoint(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_variants() {
        let err = StoreError::from_service_code("NoSuchDomain", "users");
        assert!(matches!(err, StoreError::NoSuchDomain { ref domain } if domain == "users"));
        assert_eq!(err.code(), Some("NoSuchDomain"));

        let err = StoreError::from_service_code("DuplicateItemName", "item-7");
        assert!(matches!(err, StoreError::DuplicateItemName(ref name) if name == "item-7"));
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let err = StoreError::from_service_code("SignatureDoesNotMatch", "bad signature");
        assert_eq!(err.code(), Some("SignatureDoesNotMatch"));
        assert!(err.is_service_error());
    }

    #[test]
    fn retryability_is_limited_to_transient_errors() {
        assert!(StoreError::ServiceUnavailable { retry_after: None }.is_retryable());
        assert!(StoreError::RequestTimeout.is_retryable());
        assert!(!StoreError::InvalidNextToken.is_retryable());
        assert!(!StoreError::Http("connection reset".into()).is_retryable());
    }

    #[test]
    fn client_side_errors_have_no_code() {
        assert_eq!(StoreError::Http("boom".into()).code(), None);
        assert!(!StoreError::Http("boom".into()).is_service_error());
    }
}
