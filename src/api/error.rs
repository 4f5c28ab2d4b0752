/// The ways a call to the backend can fail.
///
/// Every variant carries the HTTP status it was raised for, with `0` standing
/// in when no response was received.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The backend replied with a non-2xx status.
    ///
    /// The message comes from the body's `message` or `detail` field, then the
    /// status text, then a generic `HTTP error! status: N`.
    #[error("{message}")]
    Http { status: u16, message: String },

    /// The backend replied with something other than JSON, or with JSON of the
    /// wrong shape, e.g. an object where a list was expected.
    #[error("invalid response format")]
    InvalidFormat { status: u16 },

    /// The request never got a response: DNS failure, refused connection,
    /// timeout or a body that could not be read.
    #[error("network request failed")]
    Network,

    /// The payload was JSON of the right shape but a record in it could not be
    /// decoded, e.g. an unknown payment mode or a non-numeric amount.
    #[error("invalid record data: {message}")]
    InvalidRecord { status: u16, message: String },
}

impl ApiError {
    /// The status reported when no response was received.
    pub const NO_RESPONSE_STATUS: u16 = 0;

    /// The HTTP status of the failed call.
    pub fn status(&self) -> u16 {
        match self {
            ApiError::Http { status, .. }
            | ApiError::InvalidFormat { status }
            | ApiError::InvalidRecord { status, .. } => *status,
            ApiError::Network => Self::NO_RESPONSE_STATUS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;

    #[test]
    fn messages_match_the_taxonomy() {
        let http = ApiError::Http {
            status: 404,
            message: "Transaction not found".to_owned(),
        };
        let record = ApiError::InvalidRecord {
            status: 200,
            message: "unknown variant `Paypal`".to_owned(),
        };

        assert_eq!(http.to_string(), "Transaction not found");
        assert_eq!(
            ApiError::InvalidFormat { status: 200 }.to_string(),
            "invalid response format"
        );
        assert_eq!(ApiError::Network.to_string(), "network request failed");
        assert_eq!(record.to_string(), "invalid record data: unknown variant `Paypal`");
    }

    #[test]
    fn network_errors_have_status_zero() {
        assert_eq!(ApiError::Network.status(), 0);
        assert_eq!(ApiError::InvalidFormat { status: 502 }.status(), 502);
    }
}
