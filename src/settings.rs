use config::{Config, Environment};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub google_client_id: String,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_mysql_host")]
    pub mysql_host: String,
    #[serde(default = "default_mysql_port")]
    pub mysql_port: String,
    #[serde(default = "default_mysql_user")]
    pub mysql_user: String,
    #[serde(default)]
    pub mysql_password: String,
    #[serde(default = "default_mysql_database")]
    pub mysql_database: String,
}

fn default_mysql_host() -> String {
    "localhost".to_string()
}

fn default_mysql_port() -> String {
    "3306".to_string()
}

fn default_mysql_user() -> String {
    "root".to_string()
}

fn default_mysql_database() -> String {
    "inventory".to_string()
}

impl Settings {
    pub fn new() -> Self {
        Config::builder()
            .add_source(Environment::default())
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
