//! The holder of the authoritative verification code.

use otp_core::code::VerificationCode;
use serde_json::Value;

/// Holds the single code that is valid for the whole lifetime of the process.
///
/// The code is injected once at startup (see [`crate::settings::Code`]) and is
/// never changed afterwards, so the authority is `Copy` and can be read from any
/// number of concurrent requests without synchronization.
///
/// Note that every client of the process shares this one code: there is no
/// per-user or per-session scoping and no expiry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CodeAuthority {
    code: VerificationCode,
}

impl CodeAuthority {
    /// Create an authority holding `code`.
    pub fn new(code: VerificationCode) -> Self {
        Self { code }
    }

    /// The current code.
    pub fn lookup(&self) -> VerificationCode {
        self.code
    }

    /// Whether `candidate` loosely equals the current code.
    ///
    /// Missing or malformed candidates (`null`, objects, non-numeric strings)
    /// simply don't match.
    pub fn verify(&self, candidate: &Value) -> bool {
        let matched = self.code.loosely_matches(candidate);
        tracing::debug!(matched, "Verified candidate code");
        matched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_never_rotates() {
        let authority = CodeAuthority::new(VerificationCode::new(231524));

        for _ in 0..3 {
            assert_eq!(authority.lookup(), VerificationCode::new(231524));
        }
    }

    #[test]
    fn test_verify_is_loose() {
        let authority = CodeAuthority::new(VerificationCode::new(231524));

        assert!(authority.verify(&json!("231524")));
        assert!(authority.verify(&json!(231524)));
        assert!(!authority.verify(&json!(231525)));
        assert!(!authority.verify(&Value::Null));
    }
}
