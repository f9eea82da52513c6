// Service exports
pub mod proxy_client;
pub mod spoonacular;

pub use proxy_client::{ClientError, ProxyClient};
pub use spoonacular::{ProviderError, ProviderErrorKind, SpoonacularClient};
