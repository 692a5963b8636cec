use rocket::http::Status;
use rocket::outcome::try_outcome;
use rocket::request::{self, FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ApiError;

/// Identity asserted by the provider for the presented token.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Error)]
#[error("{0}")]
pub(crate) struct VerifyError(pub String);

/// Verifies a bearer token with the identity provider and yields its claims.
#[rocket::async_trait]
pub(crate) trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<TokenClaims, VerifyError>;
}

pub(crate) struct Verifier(pub(crate) Box<dyn TokenVerifier>);

pub(crate) struct GoogleTokenVerifier {
    client_id: String,
}

impl GoogleTokenVerifier {
    pub(crate) fn new(client_id: &str) -> GoogleTokenVerifier {
        GoogleTokenVerifier {
            client_id: client_id.to_string(),
        }
    }
}

#[rocket::async_trait]
impl TokenVerifier for GoogleTokenVerifier {
    async fn verify(&self, token: &str) -> Result<TokenClaims, VerifyError> {
        let parser = jsonwebtoken_google::Parser::new(&self.client_id);
        parser
            .parse::<TokenClaims>(token)
            .await
            .map_err(|err| VerifyError(format!("{:?}", err)))
    }
}

pub(crate) struct AuthenticatedUser(pub TokenClaims);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = ApiError;

    async fn from_request(req: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let token = match bearer_token(req) {
            Some(token) => token,
            None => {
                return Outcome::Failure((
                    Status { code: 401 },
                    ApiError::new("Missing bearer token".to_string()),
                ))
            }
        };

        let verifier = try_outcome!(req.guard::<&State<Verifier>>().await.map_failure(|_| {
            (
                Status { code: 500 },
                ApiError::new("Couldn't get token verifier".to_string()),
            )
        }));

        match verifier.0.verify(token).await {
            Ok(claims) => Outcome::Success(AuthenticatedUser(claims)),
            Err(err) => Outcome::Failure((
                Status { code: 401 },
                ApiError::new(format!("Invalid authentication credentials: {}", err)),
            )),
        }
    }
}

fn bearer_token<'r>(req: &'r Request<'_>) -> Option<&'r str> {
    req.headers().get_one("Authorization")?.strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket::http::Header;
    use rocket::local::blocking::Client;
    use rocket::serde::json::Json;

    struct StubVerifier {
        accept: bool,
    }

    #[rocket::async_trait]
    impl TokenVerifier for StubVerifier {
        async fn verify(&self, token: &str) -> Result<TokenClaims, VerifyError> {
            if self.accept {
                Ok(TokenClaims {
                    sub: format!("sub-for-{}", token),
                    email: Some("tester@example.com".to_string()),
                    name: None,
                })
            } else {
                Err(VerifyError("token rejected".to_string()))
            }
        }
    }

    #[get("/whoami")]
    fn whoami(user: AuthenticatedUser) -> Json<TokenClaims> {
        Json(user.0)
    }

    fn client(accept: bool) -> Client {
        let rocket = rocket::build()
            .manage(Verifier(Box::new(StubVerifier { accept })))
            .mount("/", routes![whoami])
            .register("/", catchers![crate::error::unauthorized]);

        Client::tracked(rocket).expect("valid rocket instance")
    }

    #[test]
    fn missing_header_is_rejected_with_challenge() {
        let client = client(true);

        let response = client.get("/whoami").dispatch();

        assert_eq!(response.status(), Status::Unauthorized);
        assert_eq!(
            response.headers().get_one("WWW-Authenticate"),
            Some("Bearer")
        );
    }

    #[test]
    fn non_bearer_scheme_is_rejected() {
        let client = client(true);

        let response = client
            .get("/whoami")
            .header(Header::new("Authorization", "Basic dXNlcjpwYXNz"))
            .dispatch();

        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[test]
    fn rejected_token_fails_the_request() {
        let client = client(false);

        let response = client
            .get("/whoami")
            .header(Header::new("Authorization", "Bearer expired-token"))
            .dispatch();

        assert_eq!(response.status(), Status::Unauthorized);
    }

    #[test]
    fn verified_token_yields_claims() {
        let client = client(true);

        let response = client
            .get("/whoami")
            .header(Header::new("Authorization", "Bearer good-token"))
            .dispatch();

        assert_eq!(response.status(), Status::Ok);
        let claims: serde_json::Value =
            serde_json::from_str(&response.into_string().unwrap()).unwrap();
        assert_eq!(claims["sub"], "sub-for-good-token");
        assert_eq!(claims["email"], "tester@example.com");
    }
}
