use std::path::PathBuf;

use crate::api::item_management::models::{ItemIn, Message};
use crate::auth::AuthenticatedUser;
use crate::db::DbConn;
use crate::error::ErrorResponse;
use crate::import::{self, ImportError};
use crate::schema;
use diesel::prelude::*;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use rocket::form::Form;
use rocket::fs::TempFile;
use rocket::http::Status;
use rocket::serde::json::Json;

#[derive(FromForm)]
pub struct UploadForm<'a> {
    file: TempFile<'a>,
}

#[post("/items/upload", data = "<form>")]
pub(crate) async fn upload_items(
    mut form: Form<UploadForm<'_>>,
    _user: AuthenticatedUser,
    conn: DbConn,
) -> Result<Json<Message>, ErrorResponse> {
    let file_name = form
        .file
        .raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_string())
        .unwrap_or_default();

    import::check_extension(&file_name).map_err(import_error)?;

    let scratch = scratch_path();
    form.file.copy_to(&scratch).await.map_err(|err| {
        ErrorResponse::new(Status { code: 500 }, format!("Couldn't read upload: {}", err))
    })?;
    let bytes = rocket::tokio::fs::read(&scratch).await.map_err(|err| {
        ErrorResponse::new(Status { code: 500 }, format!("Couldn't read upload: {}", err))
    })?;
    rocket::tokio::fs::remove_file(&scratch).await.ok();

    let rows = import::parse_rows(&file_name, &bytes).map_err(import_error)?;
    let count = rows.len();

    // one transaction for the whole batch; a failed insert commits nothing
    conn.run(move |c| {
        c.transaction::<_, diesel::result::Error, _>(|| {
            let records = rows
                .into_iter()
                .map(|row| ItemIn {
                    name: row.name,
                    description: Some(row.description),
                    price: row.price,
                    quantity: row.quantity,
                })
                .collect::<Vec<_>>();

            diesel::insert_into(schema::items::dsl::items)
                .values(&records)
                .execute(c)
        })
    })
    .await
    .map_err(|err| {
        ErrorResponse::new(Status { code: 500 }, format!("Error processing file: {}", err))
    })?;

    Ok(Json(Message {
        message: format!("Successfully uploaded {} items", count),
    }))
}

fn import_error(err: ImportError) -> ErrorResponse {
    let status = match err {
        ImportError::BadExtension | ImportError::MissingColumns(_) => Status { code: 400 },
        _ => Status { code: 500 },
    };

    ErrorResponse::new(status, err.to_string())
}

fn scratch_path() -> PathBuf {
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect();

    std::env::temp_dir().join(format!("inventory-upload-{}", suffix))
}
