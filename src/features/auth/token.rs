//! Access token inspection. The client never verifies signatures (the API
//! does); it only reads the `exp` claim to schedule the silent refresh.

use base64ct::{Base64UrlUnpadded, Encoding};
use serde::Deserialize;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[derive(Deserialize)]
struct ExpiryClaims {
    /// NumericDate; may carry a fractional part.
    exp: f64,
}

/// Reads the expiry instant from a JWT's payload segment.
///
/// Returns `None` when the token is not a three-part JWT, the payload is not
/// base64url JSON, or the `exp` claim is missing.
#[must_use]
pub fn access_token_expiry(token: &str) -> Option<SystemTime> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let bytes = Base64UrlUnpadded::decode_vec(payload.trim_end_matches('=')).ok()?;
    let claims: ExpiryClaims = serde_json::from_slice(&bytes).ok()?;

    let secs = Duration::try_from_secs_f64(claims.exp.floor()).ok()?;
    UNIX_EPOCH.checked_add(secs)
}

/// Delay until the refresh should fire: `expiry - now - lead`, never negative.
#[must_use]
pub fn refresh_delay(expiry: SystemTime, now: SystemTime, lead: Duration) -> Duration {
    expiry
        .duration_since(now)
        .unwrap_or_default()
        .saturating_sub(lead)
}

#[cfg(test)]
pub(crate) fn jwt_with_exp(exp: u64) -> String {
    let header = Base64UrlUnpadded::encode_string(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = Base64UrlUnpadded::encode_string(format!(r#"{{"exp":{exp},"sub":"1"}}"#).as_bytes());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::{access_token_expiry, jwt_with_exp, refresh_delay};
    use base64ct::{Base64UrlUnpadded, Encoding};
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn expiry_is_read_from_payload() {
        let token = jwt_with_exp(1_700_000_000);
        assert_eq!(
            access_token_expiry(&token),
            Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
        );
    }

    #[test]
    fn fractional_expiry_is_floored() {
        let payload = Base64UrlUnpadded::encode_string(br#"{"exp":1700000000.75}"#);
        assert_eq!(
            access_token_expiry(&format!("h.{payload}.s")),
            Some(UNIX_EPOCH + Duration::from_secs(1_700_000_000))
        );

        let negative = Base64UrlUnpadded::encode_string(br#"{"exp":-5}"#);
        assert_eq!(access_token_expiry(&format!("h.{negative}.s")), None);
    }

    #[test]
    fn malformed_tokens_have_no_expiry() {
        assert_eq!(access_token_expiry("not-a-jwt"), None);
        assert_eq!(access_token_expiry("a.!!!.c"), None);
        assert_eq!(access_token_expiry("a.e30.c"), None);
        assert_eq!(access_token_expiry("a.b.c.d"), None);
    }

    #[test]
    fn token_expiring_in_ninety_seconds_refreshes_after_thirty() {
        let now = UNIX_EPOCH + Duration::from_secs(1_000);
        let expiry = now + Duration::from_secs(90);
        assert_eq!(
            refresh_delay(expiry, now, Duration::from_secs(60)),
            Duration::from_secs(30)
        );
    }

    #[test]
    fn nearly_expired_tokens_refresh_immediately() {
        let now = UNIX_EPOCH + Duration::from_secs(1_000);
        assert_eq!(
            refresh_delay(now + Duration::from_secs(20), now, Duration::from_secs(60)),
            Duration::ZERO
        );
        assert_eq!(
            refresh_delay(now - Duration::from_secs(5), now, Duration::from_secs(60)),
            Duration::ZERO
        );
    }
}
