use rocket::response::{Responder, Response};
use rocket::{
    http::{ContentType, Status},
    response,
    serde::json::Json,
    Request,
};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct ApiError {
    detail: String,
}

impl ApiError {
    pub(crate) fn new(detail: String) -> ApiError {
        ApiError { detail }
    }
}

#[derive(Debug)]
pub(crate) struct ErrorResponse<T = ApiError> {
    json: Json<T>,
    status: Status,
}

impl ErrorResponse<ApiError> {
    pub(crate) fn new(status: Status, detail: String) -> ErrorResponse<ApiError> {
        ErrorResponse {
            json: Json(ApiError { detail }),
            status,
        }
    }
}

impl<'r, T: serde::Serialize> Responder<'r, 'r> for ErrorResponse<T> {
    fn respond_to(self, req: &'r Request) -> response::Result<'r> {
        Response::build_from(self.json.respond_to(req)?)
            .status(self.status)
            .header(ContentType::JSON)
            .ok()
    }
}

// Guard failures drop their error value before the catcher runs, so the 401
// body carries a fixed detail message plus the bearer challenge header.
pub(crate) struct BearerChallenge {
    json: Json<ApiError>,
}

impl<'r> Responder<'r, 'r> for BearerChallenge {
    fn respond_to(self, req: &'r Request) -> response::Result<'r> {
        Response::build_from(self.json.respond_to(req)?)
            .status(Status::Unauthorized)
            .header(ContentType::JSON)
            .raw_header("WWW-Authenticate", "Bearer")
            .ok()
    }
}

#[catch(401)]
pub(crate) fn unauthorized() -> BearerChallenge {
    BearerChallenge {
        json: Json(ApiError::new(
            "Invalid authentication credentials".to_string(),
        )),
    }
}

#[catch(default)]
pub(crate) fn fallback(status: Status, _req: &Request) -> ErrorResponse {
    ErrorResponse::new(status, status.reason().unwrap_or("Unknown error").to_string())
}
