use std::sync::Arc;

use market_db::Product as DBProduct;
use tracing::{debug, info};

use crate::{
    api::validation::normalize_keyword,
    data::market_db::client::DBClient,
    error::Result,
    models::{
        product_keyword_filter, CreateProductRequest, PageResponse, Product, ProductOrder,
        UpdateProductRequest,
    },
    pagination::{Filter, Page},
};

/// Service for product CRUD and the paginated product listing
#[derive(Clone)]
pub struct ProductService {
    db: Arc<DBClient>,
}

impl ProductService {
    pub fn new(db: Arc<DBClient>) -> Self {
        Self { db }
    }

    /// One page of products, optionally narrowed to those matching `keyword`
    pub async fn list(
        &self,
        cursor: Option<&str>,
        limit: i64,
        keyword: Option<String>,
        order: ProductOrder,
    ) -> Result<PageResponse<Product>> {
        let filter = match normalize_keyword(keyword)? {
            Some(keyword) => product_keyword_filter(&keyword),
            None => Filter::All,
        };
        let sort = order.sort_spec()?;

        debug!(target: "products::list", ?order, limit, "Listing products");
        let page: Page<DBProduct> = self.db.fetch_page(&sort, filter, cursor, limit).await?;
        Ok(PageResponse::from_page(page, Product::from))
    }

    pub async fn get(&self, id: i64) -> Result<Product> {
        Ok(self.db.get_product(id).await?.into())
    }

    pub async fn create(&self, request: CreateProductRequest) -> Result<Product> {
        let product = self.db.create_product(request.validate()?).await?;
        info!(target: "products::create", id = product.id, "Product created");
        Ok(product.into())
    }

    pub async fn update(&self, id: i64, request: UpdateProductRequest) -> Result<Product> {
        Ok(self.db.update_product(id, request.validate()?).await?.into())
    }

    /// Deletes the product together with its comments
    pub async fn delete(&self, id: i64) -> Result<Product> {
        let product = self.db.delete_product(id).await?;
        info!(target: "products::delete", id, "Product deleted");
        Ok(product.into())
    }
}
