//! Error conversion implementations.
//!
//! Internal writer errors collapse into the public [`SerializationError`],
//! keeping the writer's own message as the cause.

use super::types::SerializationError;
use crate::ooxml::error::OoxmlError;

impl From<OoxmlError> for SerializationError {
    fn from(err: OoxmlError) -> Self {
        SerializationError::new(err.to_string())
    }
}

impl From<OoxmlError> for super::types::Error {
    fn from(err: OoxmlError) -> Self {
        super::types::Error::Serialization(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;

    #[test]
    fn test_ooxml_error_keeps_cause() {
        let err: SerializationError = OoxmlError::Xml("bad part".to_string()).into();
        assert_eq!(err.cause(), "XML error: bad part");
        assert!(err.to_string().contains("bad part"));
    }

    #[test]
    fn test_error_variants_are_distinguishable() {
        let err: Error = OoxmlError::Other("disk full".to_string()).into();
        assert!(matches!(err, Error::Serialization(_)));

        let err = Error::UnsupportedInput("notes.txt".to_string());
        assert!(err.to_string().contains("notes.txt"));
    }
}
