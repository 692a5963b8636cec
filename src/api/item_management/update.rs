use crate::api::item_management::models::{Item, ItemIn, ItemOut};
use crate::auth::AuthenticatedUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;

// Full replace of every mutable column; there is no partial-update variant.
#[put("/items/<item_id>", format = "json", data = "<item>")]
pub(crate) async fn update_item(
    item_id: i32,
    item: Json<ItemIn>,
    _user: AuthenticatedUser,
    conn: DbConn,
) -> Result<Json<ItemOut>, ErrorResponse> {
    use schema::items::dsl::*;

    let changes = item.into_inner();

    let updated = conn
        .run(move |c| {
            c.transaction::<Item, diesel::result::Error, _>(|| {
                items.find(item_id).first::<Item>(c)?;
                diesel::update(items.find(item_id)).set(&changes).execute(c)?;
                items.find(item_id).first::<Item>(c)
            })
        })
        .await
        .map_err(|err| match err {
            diesel::result::Error::NotFound => {
                ErrorResponse::new(Status { code: 404 }, "Item not found".to_string())
            }
            err => {
                ErrorResponse::new(Status { code: 500 }, format!("Couldn't update item: {}", err))
            }
        })?;

    Ok(Json(ItemOut::from(updated)))
}
