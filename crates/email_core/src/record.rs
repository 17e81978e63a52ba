use crate::validate::validate;
use serde::Serialize;

/// Read-only view of one token, as handed to callers and change listeners.
///
/// Never stored: always derived from the canonical token sequence.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EmailRecord {
    pub value: String,
    pub valid: bool,
}

impl EmailRecord {
    pub fn from_token(token: &str) -> Self {
        Self {
            value: token.to_string(),
            valid: validate(token),
        }
    }
}

/// Project a token sequence into records, preserving order and duplicates.
pub fn records<S: AsRef<str>>(tokens: &[S]) -> Vec<EmailRecord> {
    tokens
        .iter()
        .map(|t| EmailRecord::from_token(t.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_follow_validator_pointwise() {
        let out = records(&["some@valid.email", "invalid.email", "some@valid.email"]);
        assert_eq!(out, vec![
            EmailRecord {
                value: "some@valid.email".into(),
                valid: true
            },
            EmailRecord {
                value: "invalid.email".into(),
                valid: false
            },
            EmailRecord {
                value: "some@valid.email".into(),
                valid: true
            },
        ]);
    }
}
