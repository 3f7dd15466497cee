mod config;
mod routes;

pub use config::{Credentials, Env, TtsProxyConfig};
pub use routes::router;
