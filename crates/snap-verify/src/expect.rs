//! In-memory verification against expected text.

use similar::TextDiff;
use tracing::debug;

use crate::error::VerifyError;
use crate::Verifier;

/// Verifies received text against a fixed expected string.
///
/// Line endings are normalized to `\n` on both sides before comparing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Expect {
    approved: String,
}

impl Expect {
    pub fn new(approved: impl Into<String>) -> Self {
        Self {
            approved: normalize(&approved.into()),
        }
    }

    pub fn approved(&self) -> &str {
        &self.approved
    }
}

impl Verifier for Expect {
    fn verify(&self, received: &str) -> Result<(), VerifyError> {
        let received = normalize(received);
        if received == self.approved {
            return Ok(());
        }
        let diff = TextDiff::from_lines(self.approved.as_str(), received.as_str())
            .unified_diff()
            .context_radius(3)
            .header("approved", "received")
            .to_string();
        debug!(lines = diff.lines().count(), "verification mismatch");
        Err(VerifyError::Mismatch { diff })
    }
}

fn normalize(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_text_passes() {
        let expect = Expect::new("{\r\n  \"A\": 1\r\n}");
        assert!(expect.verify("{\n  \"A\": 1\n}").is_ok());
    }

    #[test]
    fn mismatch_reports_unified_diff() {
        let expect = Expect::new("{\n  \"A\": 1\n}\n");
        let err = expect.verify("{\n  \"A\": 2\n}\n").unwrap_err();
        let VerifyError::Mismatch { diff } = err else {
            panic!("expected mismatch");
        };
        assert!(diff.contains("--- approved"));
        assert!(diff.contains("+++ received"));
        assert!(diff.contains("-  \"A\": 1"));
        assert!(diff.contains("+  \"A\": 2"));
    }

    #[test]
    fn closures_are_verifiers() {
        let reject = |text: &str| {
            if text.is_empty() {
                Err(VerifyError::Failed("empty".into()))
            } else {
                Ok(())
            }
        };
        assert!(Verifier::verify(&reject, "x").is_ok());
        assert!(Verifier::verify(&reject, "").is_err());
    }
}
