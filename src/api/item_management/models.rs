use std::fmt::Debug;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::schema::items;

#[derive(Queryable, Debug)]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

/// Client-supplied fields; `id` and `created_at` are always the server's.
/// Updates replace every mutable column, so a missing description nulls it.
#[derive(Deserialize, Insertable, AsChangeset)]
#[table_name = "items"]
#[changeset_options(treat_none_as_null = "true")]
pub struct ItemIn {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
}

#[derive(Serialize)]
pub struct ItemOut {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
    pub quantity: i32,
    pub created_at: NaiveDateTime,
}

impl From<Item> for ItemOut {
    fn from(item: Item) -> ItemOut {
        ItemOut {
            id: item.id,
            name: item.name,
            description: item.description,
            price: item.price,
            quantity: item.quantity,
            created_at: item.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct Message {
    pub message: String,
}
