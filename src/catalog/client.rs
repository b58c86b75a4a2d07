use std::ops::RangeInclusive;

use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::catalog::{CatalogError, CatalogProduct, CatalogSource};
use crate::config::CatalogConfig;

#[derive(Debug, Deserialize)]
struct ProductPage {
    #[serde(default)]
    products: Vec<CatalogProduct>
}

/// HTTP catalog client.
///
/// Each request is bounded by the configured timeout. Answers (including "not found")
/// are cached per identifier so repeated lookups within a run hit the network once.
pub struct HttpCatalogClient {
    client: Client,
    base_url: String,
    cache: Cache<u32, Option<CatalogProduct>>
}

impl HttpCatalogClient {
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()?;

        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(config.cache_ttl)
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cache
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, CatalogError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            return Err(CatalogError::Status {
                target: url.to_string(),
                status: status.as_u16()
            });
        }

        Ok(Some(response.json().await?))
    }
}

impl CatalogSource for HttpCatalogClient {
    async fn product(&self, id: u32) -> Result<Option<CatalogProduct>, CatalogError> {
        if let Some(cached) = self.cache.get(&id).await {
            debug!("Catalog cache hit for product [{id}]");
            return Ok(cached);
        }

        let url = format!("{}/products/{id}", self.base_url);
        let product = self.get_json::<CatalogProduct>(&url).await?;

        self.cache.insert(id, product.clone()).await;

        Ok(product)
    }

    async fn products(&self, range: RangeInclusive<u32>) -> Result<Vec<CatalogProduct>, CatalogError> {
        let (start, end) = (*range.start(), *range.end());

        if start == 0 || start > end {
            return Ok(Vec::new());
        }

        let url = format!("{}/products?limit={}&skip={}", self.base_url, end - start + 1, start - 1);
        let page = self.get_json::<ProductPage>(&url).await?.map(|page| page.products).unwrap_or_default();

        let mut products = Vec::with_capacity(page.len());

        for product in page.into_iter().filter(|product| range.contains(&product.id)) {
            self.cache.insert(product.id, Some(product.clone())).await;
            products.push(product);
        }

        debug!("Catalog batch {start}-{end} returned {} products", products.len());

        Ok(products)
    }
}
