use std::env;

/// Process settings, all environment-provided.
#[derive(Debug, Clone)]
pub struct Config {
    pub mongodb_uri: String,
    pub front_secret: String,
    pub helium_secret: String,
    pub port: u16,
    pub registry_path: Option<String>,
}

impl Config {
    pub fn from_env() -> Config {
        Config {
            mongodb_uri: env::var("MONGODB_URI")
                .expect("You must set the MONGODB_URI environment var!"),
            front_secret: env::var("INTELLIZON_FRONT_API_KEY")
                .expect("You must set the INTELLIZON_FRONT_API_KEY environment var!"),
            helium_secret: env::var("HELIUM_IOT_API_KEY")
                .expect("You must set the HELIUM_IOT_API_KEY environment var!"),
            port: env::var("PORT")
                .ok()
                .and_then(|port| port.parse().ok())
                .unwrap_or(3000),
            registry_path: env::var("REGISTRY_PATH").ok(),
        }
    }
}
