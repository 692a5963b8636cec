use crate::api::item_management::models::{Item, ItemOut};
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use rocket::http::Status;
use rocket::serde::json::Json;

#[get("/items/search?<q>")]
pub(crate) async fn search_items(
    q: String,
    conn: DbConn,
) -> Result<Json<Vec<ItemOut>>, ErrorResponse> {
    use schema::items::dsl::*;

    // the items table uses a case-insensitive collation, so LIKE matches
    // either case
    let pattern = format!("%{}%", q);

    let item_list = conn
        .run(move |c| {
            items
                .filter(name.like(pattern.clone()).or(description.like(pattern)))
                .load::<Item>(c)
        })
        .await
        .map_err(|_| {
            ErrorResponse::new(Status { code: 500 }, "Couldn't search items".to_string())
        })?;

    Ok(Json(item_list.into_iter().map(ItemOut::from).collect()))
}
