// Infrastructure: token storage and the HTTP broker client

pub mod broker;
pub mod session;

pub use broker::{KiteClient, DEFAULT_API_ROOT};
pub use session::{TokenFile, DEFAULT_TOKEN_FILE};
