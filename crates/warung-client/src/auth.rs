//! # Auth Token Handling
//!
//! The backend authenticates requests with `Authorization: Bearer <token>`
//! and stamps submitted orders with the cashier's user id. That id lives in
//! the token's `sub` claim, which we read client-side.
//!
//! Signature validation is deliberately disabled: the token is opaque
//! client state issued and verified by the backend. We only need the claim
//! out of it; a forged token fails on the server regardless of what we
//! decode here.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::error::ClientResult;

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(deserialize_with = "sub_as_string")]
    sub: String,
}

/// Extracts the user id (`sub` claim) from a bearer token.
pub fn user_id_from_token(token: &str) -> ClientResult<String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(data.claims.sub)
}

/// `sub` arrives as a string per RFC 7519, but some issuers emit the raw
/// numeric user id. Accept both.
fn sub_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SubRepr {
        Num(i64),
        Str(String),
    }

    Ok(match SubRepr::deserialize(deserializer)? {
        SubRepr::Num(n) => n.to_string(),
        SubRepr::Str(s) => s,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    fn token_for(claims: serde_json::Value) -> String {
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap()
    }

    #[test]
    fn test_string_sub() {
        let token = token_for(json!({ "sub": "user-7" }));
        assert_eq!(user_id_from_token(&token).unwrap(), "user-7");
    }

    #[test]
    fn test_numeric_sub() {
        let token = token_for(json!({ "sub": 7 }));
        assert_eq!(user_id_from_token(&token).unwrap(), "7");
    }

    #[test]
    fn test_signature_is_not_checked() {
        // Signed with a key we do not hold; decode must still succeed
        let token = encode(
            &Header::default(),
            &json!({ "sub": "user-7" }),
            &EncodingKey::from_secret(b"someone-elses-secret"),
        )
        .unwrap();
        assert_eq!(user_id_from_token(&token).unwrap(), "user-7");
    }

    #[test]
    fn test_garbage_token_errors() {
        assert!(user_id_from_token("not-a-jwt").is_err());
    }
}
