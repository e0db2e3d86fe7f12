use std::{collections::HashMap, sync::Arc};

use rocket::{
    http::Status,
    request::{self, FromRequest, Request},
};
use tracing::{debug, error, warn};

use crate::{data::UserRef, error::GameError};

/// Identity collaborator: turns an opaque token into a user identifier.
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Option<String>;
}

pub type Verifier = Arc<dyn IdentityVerifier>;

/// Fixed token table, configured through `AUTH_TOKENS`.
#[derive(Debug, Default)]
pub struct TokenTable {
    tokens: HashMap<String, String>,
}

impl TokenTable {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            tokens: pairs.into_iter().collect(),
        }
    }
}

impl IdentityVerifier for TokenTable {
    fn verify(&self, token: &str) -> Option<String> {
        self.tokens.get(token).cloned()
    }
}

/// The authenticated caller, from an `Authorization: Bearer <token>` header.
#[derive(Debug)]
pub struct Player(pub UserRef);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Player {
    type Error = GameError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let Some(verifier) = req.rocket().state::<Verifier>() else {
            error!("No identity verifier is managed, rejecting request");
            return request::Outcome::Error((Status::InternalServerError, GameError::Unauthorized));
        };

        let token = req
            .headers()
            .get_one("Authorization")
            .and_then(|header| header.strip_prefix("Bearer "))
            .map(str::trim);

        match token.and_then(|token| verifier.verify(token)) {
            Some(id) => {
                debug!("Authenticated request from {}", id);
                request::Outcome::Success(Player(UserRef::new(id)))
            }
            None => {
                warn!("Rejected request with missing or unknown token");
                request::Outcome::Error((Status::Unauthorized, GameError::Unauthorized))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_known_tokens_only() {
        let table = TokenTable::new([("secret".to_string(), "alice".to_string())]);
        assert_eq!(table.verify("secret"), Some("alice".to_string()));
        assert_eq!(table.verify("guess"), None);
    }
}
