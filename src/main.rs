mod api;
mod auth;
mod cors;
mod db;
mod error;
mod import;
mod schema;
mod settings;

#[macro_use]
extern crate rocket;
#[macro_use]
extern crate diesel;
extern crate dotenv;
#[macro_use]
extern crate diesel_migrations;

use auth::{GoogleTokenVerifier, Verifier};
use cors::CORS;
use db::DbConn;
use rocket::fairing::AdHoc;
use settings::Settings;

#[get("/")]
fn index() -> &'static str {
    "Inventory Management API"
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let settings = Settings::new();
    let verifier = Verifier(Box::new(GoogleTokenVerifier::new(&settings.google_client_id)));

    let figment = rocket::Config::figment()
        .merge(("databases.inventory.url", db::connection_url(&settings)));

    rocket::custom(figment)
        .attach(CORS)
        .attach(DbConn::fairing())
        .attach(AdHoc::on_ignite("Database migrations", db::run_db_migrations))
        .manage(verifier)
        .mount("/", routes![index])
        .mount(
            "/api",
            routes![
                crate::api::item_management::list::get_items,
                crate::api::item_management::search::search_items,
                crate::api::item_management::create::create_item,
                crate::api::item_management::update::update_item,
                crate::api::item_management::delete::delete_item,
                crate::api::item_management::upload::upload_items,
            ],
        )
        .register("/", catchers![error::unauthorized, error::fallback])
}
