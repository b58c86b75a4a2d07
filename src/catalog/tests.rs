use super::{
    enrich, fetch_mapping, fetch_mapping_range, read_enriched, remote_identifier, write_enriched, CatalogError, CatalogProduct,
    CatalogSource, EnrichmentSummary, HttpCatalogClient, ProductMapping
};
use super::output::ENRICHED_HEADER;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Result;
use rust_decimal::Decimal;
use tempfile::tempdir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use crate::config::CatalogConfig;
use crate::models::{ParsedRecord, Transaction};

/// In-memory catalog that records which identifiers were requested.
struct InMemoryCatalog {
    products: HashMap<u32, CatalogProduct>,
    failing: Vec<u32>,
    requests: RefCell<Vec<u32>>
}

impl InMemoryCatalog {
    fn new(products: Vec<CatalogProduct>) -> Self {
        Self {
            products: products.into_iter().map(|product| (product.id, product)).collect(),
            failing: Vec::new(),
            requests: RefCell::new(Vec::new())
        }
    }

    fn failing_on(mut self, ids: &[u32]) -> Self {
        self.failing = ids.to_vec();
        self
    }
}

impl CatalogSource for InMemoryCatalog {
    async fn product(&self, id: u32) -> Result<Option<CatalogProduct>, CatalogError> {
        self.requests.borrow_mut().push(id);

        if self.failing.contains(&id) {
            return Err(CatalogError::Status { target: format!("/products/{id}"), status: 500 });
        }

        Ok(self.products.get(&id).cloned())
    }
}

fn catalog_product(id: u32, category: &str, brand: Option<&str>, rating: f64) -> CatalogProduct {
    CatalogProduct {
        id,
        category: Some(category.to_string()),
        brand: brand.map(str::to_string),
        rating: Some(rating)
    }
}

fn create_transaction(id: &str, product_id: &str, quantity: i64) -> Result<Transaction> {
    Ok(Transaction::try_from(ParsedRecord {
        transaction_id: id.to_string(),
        date: "2024-12-01".to_string(),
        product_id: product_id.to_string(),
        product_name: format!("Product {product_id}"),
        quantity,
        unit_price: Decimal::from_str("19.99")?,
        customer_id: "C001".to_string(),
        region: "North".to_string()
    })?)
}

/// Serves canned HTTP responses keyed by request path; unknown paths get a 404.
async fn spawn_catalog_server(routes: Vec<(&'static str, &'static str)>) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;
    let routes: HashMap<&'static str, &'static str> = routes.into_iter().collect();

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            let mut buffer = vec![0u8; 4096];
            let Ok(read) = socket.read(&mut buffer).await else { continue };
            let request = String::from_utf8_lossy(&buffer[..read]).to_string();
            let path = request.split_whitespace().nth(1).unwrap_or("/").to_string();

            let (status, body) = match routes.get(path.as_str()) {
                Some(body) => ("200 OK", *body),
                None => ("404 Not Found", "{\"message\":\"not found\"}")
            };

            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );

            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });

    Ok(format!("http://{address}"))
}

fn client_for(base_url: String, timeout: Duration) -> Result<HttpCatalogClient> {
    Ok(HttpCatalogClient::new(&CatalogConfig {
        base_url,
        timeout,
        ..CatalogConfig::default()
    })?)
}

#[test]
fn test_remote_identifier_strips_product_prefix() {
    assert_eq!(remote_identifier("P101"), Some(101));
    assert_eq!(remote_identifier("P007"), Some(7));
    assert_eq!(remote_identifier("P0"), None);
    assert_eq!(remote_identifier("PX1"), None);
    assert_eq!(remote_identifier("PX12"), None);
    assert_eq!(remote_identifier("101"), None);
    assert_eq!(remote_identifier("P"), None);
}

#[test]
fn test_catalog_product_decodes_dummyjson_payload() -> Result<()> {
    let payload = r#"{"id":101,"title":"Apple AirPods Max Silver","category":"mobile-accessories","price":549.99,"rating":3.47,"brand":"Apple","tags":["audio"]}"#;
    let product: CatalogProduct = serde_json::from_str(payload)?;

    assert_eq!(product, catalog_product(101, "mobile-accessories", Some("Apple"), 3.47));

    let without_brand: CatalogProduct = serde_json::from_str(r#"{"id":5,"category":"groceries","rating":4.1}"#)?;

    assert_eq!(without_brand.brand, None);

    Ok(())
}

#[test]
fn test_enrich_matches_known_products_only() -> Result<()> {
    let transactions = vec![
        create_transaction("T1", "P101", 2)?,
        create_transaction("T2", "P999", 1)?,
        create_transaction("T3", "PABC", 4)?,
        create_transaction("T4", "P101", 3)?,
    ];
    let mapping = ProductMapping::from_products(vec![catalog_product(101, "laptops", Some("Apple"), 4.7)]);

    let enriched = enrich(&transactions, &mapping);

    assert_eq!(enriched.len(), 4);
    assert!(enriched[0].is_matched());
    assert_eq!(enriched[0].category(), Some("laptops"));
    assert_eq!(enriched[0].brand(), Some("Apple"));
    assert!(!enriched[1].is_matched());
    assert!(!enriched[2].is_matched());
    assert_eq!(enriched[2].category(), None);
    assert_eq!(enriched[3].transaction, transactions[3]);

    let summary = EnrichmentSummary::from_enriched(&enriched);

    assert_eq!(summary.matched, 2);
    assert_eq!(summary.total, 4);
    assert_eq!(summary.success_rate, Decimal::from(50));
    assert_eq!(summary.unmatched_products, vec!["P999", "PABC"]);

    Ok(())
}

#[tokio::test]
async fn test_fetch_mapping_looks_up_each_distinct_product_once() -> Result<()> {
    let catalog = InMemoryCatalog::new(vec![
        catalog_product(101, "laptops", None, 4.0),
        catalog_product(102, "smartphones", Some("Samsung"), 4.2),
    ]);
    let transactions = vec![
        create_transaction("T1", "P102", 1)?,
        create_transaction("T2", "P101", 1)?,
        create_transaction("T3", "P102", 1)?,
        create_transaction("T4", "P103", 1)?,
    ];

    let mapping = fetch_mapping(&catalog, &transactions).await;

    assert_eq!(mapping.len(), 2);
    assert_eq!(*catalog.requests.borrow(), vec![101, 102, 103]);
    assert_eq!(mapping.get(102).and_then(|attributes| attributes.brand.as_deref()), Some("Samsung"));

    Ok(())
}

#[tokio::test]
async fn test_failed_lookups_do_not_abort_the_batch() -> Result<()> {
    let catalog = InMemoryCatalog::new(vec![
        catalog_product(101, "laptops", None, 4.0),
        catalog_product(103, "tablets", None, 3.9),
    ])
    .failing_on(&[102]);

    let transactions = vec![
        create_transaction("T1", "P101", 1)?,
        create_transaction("T2", "P102", 1)?,
        create_transaction("T3", "P103", 1)?,
    ];

    let mapping = fetch_mapping(&catalog, &transactions).await;
    let ranged = fetch_mapping_range(&catalog, 101..=103).await;

    assert_eq!(mapping.len(), 2);
    assert!(mapping.get(102).is_none());
    assert_eq!(ranged.len(), 2);

    Ok(())
}

#[test]
fn test_enriched_file_round_trip_preserves_ids_and_quantities() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("nested").join("enriched.txt");
    let transactions = vec![
        create_transaction("T1", "P101", 2)?,
        create_transaction("T2", "P555", 7)?,
    ];
    let mapping = ProductMapping::from_products(vec![CatalogProduct {
        id: 101,
        category: Some("laptops".to_string()),
        brand: None,
        rating: Some(4.25)
    }]);
    let enriched = enrich(&transactions, &mapping);

    write_enriched(&path, &enriched, "Enrichment run\nwith two lines")?;

    let content = fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();

    assert_eq!(lines[0], "# Enrichment run with two lines");
    assert_eq!(lines[1], ENRICHED_HEADER.join("|"));
    assert_eq!(lines[2], "T1|2024-12-01|P101|Product P101|2|19.99|C001|North|laptops||4.25|true");
    assert_eq!(lines[3], "T2|2024-12-01|P555|Product P555|7|19.99|C001|North||||false");

    let read_back = read_enriched(&path)?;

    let expected: Vec<(&str, i64)> = enriched.iter().map(|e| (e.transaction.transaction_id(), e.transaction.quantity())).collect();
    let actual: Vec<(&str, i64)> = read_back.iter().map(|e| (e.transaction.transaction_id(), e.transaction.quantity())).collect();

    assert_eq!(actual, expected);
    assert_eq!(read_back, enriched);

    Ok(())
}

#[test]
fn test_enriched_file_with_no_rows_still_has_header() -> Result<()> {
    let directory = tempdir()?;
    let path = directory.path().join("empty.txt");

    write_enriched(&path, &[], "nothing to enrich")?;

    assert_eq!(fs::read_to_string(&path)?.lines().count(), 2);
    assert!(read_enriched(&path)?.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_http_client_fetches_and_caches_products() -> Result<()> {
    let base_url = spawn_catalog_server(vec![
        ("/products/101", r#"{"id":101,"category":"laptops","brand":"Apple","rating":4.5}"#),
    ])
    .await?;
    let client = client_for(base_url, Duration::from_secs(5))?;

    let found = client.product(101).await?;
    let missing = client.product(404).await?;
    let cached = client.product(101).await?;

    assert_eq!(found, Some(catalog_product(101, "laptops", Some("Apple"), 4.5)));
    assert_eq!(missing, None);
    assert_eq!(cached, found);

    Ok(())
}

#[tokio::test]
async fn test_http_client_fetches_a_range_in_one_request() -> Result<()> {
    let base_url = spawn_catalog_server(vec![
        ("/products?limit=3&skip=100", r#"{"products":[{"id":101,"category":"a"},{"id":102,"category":"b"},{"id":250,"category":"c"}],"total":3}"#),
    ])
    .await?;
    let client = client_for(base_url, Duration::from_secs(5))?;

    let mapping = fetch_mapping_range(&client, 101..=103).await;

    assert_eq!(mapping.len(), 2);
    assert!(mapping.get(250).is_none());
    assert_eq!(client.product(102).await?.and_then(|product| product.category), Some("b".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_http_client_timeout_is_treated_as_no_data() -> Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let client = client_for(format!("http://{address}"), Duration::from_millis(200))?;

    assert!(client.product(101).await.is_err());

    let mapping = fetch_mapping(&client, &[create_transaction("T1", "P101", 1)?]).await;

    assert!(mapping.is_empty());

    Ok(())
}
