use crate::api::item_management::models::{Item, ItemOut};
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;

#[get("/items")]
pub(crate) async fn get_items(conn: DbConn) -> Result<Json<Vec<ItemOut>>, ErrorResponse> {
    use schema::items::dsl::*;

    let item_list = conn
        .run(|c| items.load::<Item>(c))
        .await
        .map_err(|_| ErrorResponse::new(Status { code: 500 }, "Couldn't load items".to_string()))?;

    Ok(Json(item_list.into_iter().map(ItemOut::from).collect()))
}
