//! Lazily built per-product API clients

use anyhow::Result;
use once_cell::sync::OnceCell;
use reqwest::Client;
use tracing::debug;

use crate::api::client::{IonosClient, USER_AGENT};
use crate::api::product::Product;
use crate::config::Config;

/// Hands out product clients sharing one HTTP connection pool.
///
/// Nothing touches credentials or the network until a client is requested,
/// so commands that never call the API work without a login.
pub struct Clients {
    config: Config,
    http: OnceCell<Client>,
}

impl Clients {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http: OnceCell::new(),
        }
    }

    fn http(&self) -> Result<&Client> {
        self.http.get_or_try_init(|| -> Result<Client> {
            debug!("building HTTP client");
            Ok(Client::builder().user_agent(USER_AGENT).build()?)
        })
    }

    /// Client for `product`; `location` picks the region of regional products
    pub fn get(&self, product: Product, location: Option<&str>) -> Result<IonosClient> {
        let credentials = self.config.credentials()?;
        let base_url = match &self.config.api_url {
            Some(url) => url.clone(),
            None => product.base_url(location)?,
        };
        debug!("{} client -> {}", product, base_url);

        Ok(IonosClient::new(
            self.http()?.clone(),
            product,
            base_url,
            credentials,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_credentials() {
        let clients = Clients::new(Config::default());
        assert!(clients.get(Product::Cdn, None).is_err());
    }

    #[test]
    fn test_api_url_overrides_product() {
        let clients = Clients::new(Config {
            token: Some("t".into()),
            api_url: Some("http://localhost:1234".into()),
            ..Default::default()
        });
        let client = clients.get(Product::Kafka, Some("gb/lhr")).unwrap();
        assert_eq!(client.base_url(), "http://localhost:1234");
        assert_eq!(client.product(), Product::Kafka);
    }

    #[test]
    fn test_regional_client() {
        let clients = Clients::new(Config {
            token: Some("t".into()),
            ..Default::default()
        });
        let client = clients.get(Product::Kafka, Some("es/vit")).unwrap();
        assert_eq!(client.base_url(), "https://kafka.es-vit.ionos.com");
    }
}
