use crate::api::item_management::models::Message;
use crate::auth::AuthenticatedUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;

#[delete("/items/<item_id>")]
pub(crate) async fn delete_item(
    item_id: i32,
    _user: AuthenticatedUser,
    conn: DbConn,
) -> Result<Json<Message>, ErrorResponse> {
    use schema::items::dsl::*;

    let deleted = conn
        .run(move |c| diesel::delete(items.find(item_id)).execute(c))
        .await
        .map_err(|err| {
            ErrorResponse::new(Status { code: 500 }, format!("Couldn't delete item: {}", err))
        })?;

    if deleted == 0 {
        return Err(ErrorResponse::new(
            Status { code: 404 },
            "Item not found".to_string(),
        ));
    }

    Ok(Json(Message {
        message: "Item deleted".to_string(),
    }))
}
