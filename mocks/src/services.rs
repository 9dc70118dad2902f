//! Services exercised by the fixtures
//!
//! Small collaborators with one dependency each, so that tests can stub the
//! dependency and observe the subject.

use std::fmt;
use std::sync::Arc;

/// Computes the length of strings
pub trait CountingService: Send + Sync {
    fn string_length(&self, value: &str) -> i32;
}

/// Adds string lengths computed by a [`CountingService`]
pub struct AddingService {
    counting_service: Arc<dyn CountingService>,
}

impl AddingService {
    pub fn new(counting_service: Arc<dyn CountingService>) -> Self {
        Self { counting_service }
    }

    pub fn add_lengths(&self, first: &str, second: &str) -> i64 {
        i64::from(self.counting_service.string_length(first))
            + i64::from(self.counting_service.string_length(second))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    pub id: i32,
    pub name: String,
}

impl Product {
    pub fn new(id: i32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Product(id={}, name={})", self.id, self.name)
    }
}

pub trait ProductRepository: Send + Sync {
    fn get_by_id(&self, id: i32) -> Option<Product>;
}

pub trait LoggingService: Send + Sync {
    fn log(&self, message: &str);
}

/// Real logging service writing through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleLoggingService;

impl LoggingService for ConsoleLoggingService {
    fn log(&self, message: &str) {
        tracing::info!(target: "mocks::console", "{message}");
    }
}

/// Looks up products and logs every lookup
pub struct ProductService {
    product_repository: Arc<dyn ProductRepository>,
    logging_service: Arc<dyn LoggingService>,
}

impl ProductService {
    pub fn new(
        product_repository: Arc<dyn ProductRepository>,
        logging_service: Arc<dyn LoggingService>,
    ) -> Self {
        Self {
            product_repository,
            logging_service,
        }
    }

    pub fn get_product_by_id(&self, product_id: i32) -> Option<Product> {
        let product = self.product_repository.get_by_id(product_id);
        let rendered = match &product {
            Some(product) => product.to_string(),
            None => "none".to_string(),
        };
        self.logging_service
            .log(&format!("Retrieved product for ID {product_id}: {rendered}"));
        product
    }
}
