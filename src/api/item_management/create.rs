use crate::api::item_management::models::{Item, ItemIn, ItemOut};
use crate::auth::AuthenticatedUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::schema;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Unsigned};
use rocket::http::Status;
use rocket::serde::json::Json;

no_arg_sql_function!(last_insert_id, Unsigned<BigInt>);

#[post("/items", format = "json", data = "<item>")]
pub(crate) async fn create_item(
    item: Json<ItemIn>,
    _user: AuthenticatedUser,
    conn: DbConn,
) -> Result<Json<ItemOut>, ErrorResponse> {
    use schema::items::dsl::*;

    let new_item = item.into_inner();

    let created = conn
        .run(move |c| {
            c.transaction::<_, diesel::result::Error, _>(|| {
                diesel::insert_into(items).values(&new_item).execute(c)?;

                // MySQL has no RETURNING; read back the row the insert made
                let new_id: u64 = diesel::select(last_insert_id).get_result(c)?;
                items.find(new_id as i32).first::<Item>(c)
            })
        })
        .await
        .map_err(|err| {
            ErrorResponse::new(Status { code: 500 }, format!("Couldn't create item: {}", err))
        })?;

    Ok(Json(ItemOut::from(created)))
}
