use thiserror::Error;

/// Request-level failures. Any of these rejects the whole batch.
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("request body is not valid JSON: {0}")]
    MalformedJson(#[source] serde_json::Error),

    #[error("request body must be a JSON object")]
    NotAnObject,

    #[error("request body is missing the `values` array")]
    MissingValues,

    #[error("`values` must be an array")]
    ValuesNotArray,

    #[error("record {index} is invalid: {source}")]
    InvalidRecord {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_record_names_index() {
        let source = serde_json::from_str::<u8>("\"x\"").unwrap_err();
        let err = EnrichmentError::InvalidRecord { index: 4, source };
        assert!(err.to_string().starts_with("record 4 is invalid"));
    }

    #[test]
    fn missing_values_message() {
        assert!(
            EnrichmentError::MissingValues
                .to_string()
                .contains("`values`")
        );
    }
}
