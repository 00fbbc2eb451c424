use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use market_db::{
    models::{NewProduct, ProductChangeset},
    Product as DBProduct,
};

use crate::{
    api::validation::{validate_max_len, validate_text},
    constants::validation::{
        MAX_PRODUCT_DESCRIPTION_LEN, MAX_PRODUCT_NAME_LEN, MAX_TAGS, MAX_TAG_LEN,
    },
    error::Error,
    pagination::{FieldAccess, Filter, KeyValue, PaginationError, SortField, SortSpec, ValueKind},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: i64,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DBProduct> for Product {
    fn from(db: DBProduct) -> Self {
        Self {
            id: db.id.to_string(),
            name: db.name,
            description: db.description,
            price: db.price,
            tags: db.tags,
            created_at: db.created_at.and_utc(),
            updated_at: db.updated_at.and_utc(),
        }
    }
}

impl FieldAccess for DBProduct {
    fn field(&self, name: &str) -> Option<KeyValue> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "description" => Some(self.description.as_str().into()),
            "price" => Some(self.price.into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }

    fn list_field(&self, name: &str) -> Option<&[String]> {
        match name {
            "tags" => Some(&self.tags),
            _ => None,
        }
    }
}

/// Order of the product listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProductOrder {
    /// Newest first
    #[default]
    Recent,
    /// Cheapest first
    PriceAsc,
    /// Most expensive first
    PriceDesc,
}

impl ProductOrder {
    pub fn sort_spec(&self) -> Result<SortSpec, PaginationError> {
        let first = match self {
            Self::Recent => SortField::desc("created_at", ValueKind::Timestamp),
            Self::PriceAsc => SortField::asc("price", ValueKind::Int),
            Self::PriceDesc => SortField::desc("price", ValueKind::Int),
        };
        SortSpec::new([first, SortField::asc("id", ValueKind::Int)])
    }
}

impl FromStr for ProductOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(Self::Recent),
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            other => Err(Error::BadRequest(format!(
                "Unknown order `{other}`, expected recent|price_asc|price_desc"
            ))),
        }
    }
}

/// Matches products whose name or description contains `keyword`, or
/// which carry it as a tag.
pub fn product_keyword_filter(keyword: &str) -> Filter {
    Filter::Or(vec![
        Filter::contains("name", keyword),
        Filter::contains("description", keyword),
        Filter::includes("tags", keyword),
    ])
}

/// Query parameters of the product listing, besides `cursor` and `limit`
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    pub keyword: Option<String>,
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateProductRequest {
    pub fn validate(self) -> Result<NewProduct, Error> {
        validate_text("name", &self.name, MAX_PRODUCT_NAME_LEN)?;
        validate_max_len("description", &self.description, MAX_PRODUCT_DESCRIPTION_LEN)?;
        validate_price(self.price)?;
        validate_tags(&self.tags)?;
        Ok(NewProduct {
            name: self.name,
            description: self.description,
            price: self.price,
            tags: self.tags,
        })
    }
}

/// Partial update: absent fields keep their value
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub tags: Option<Vec<String>>,
}

impl UpdateProductRequest {
    pub fn validate(self) -> Result<ProductChangeset, Error> {
        if let Some(name) = &self.name {
            validate_text("name", name, MAX_PRODUCT_NAME_LEN)?;
        }
        if let Some(description) = &self.description {
            validate_max_len("description", description, MAX_PRODUCT_DESCRIPTION_LEN)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(ProductChangeset {
            name: self.name,
            description: self.description,
            price: self.price,
            tags: self.tags,
            updated_at: None,
        })
    }
}

fn validate_price(price: i64) -> Result<(), Error> {
    if price < 0 {
        return Err(Error::BadRequest("price must not be negative".to_string()));
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), Error> {
    if tags.len() > MAX_TAGS {
        return Err(Error::BadRequest(format!(
            "at most {MAX_TAGS} tags are allowed"
        )));
    }
    for tag in tags {
        validate_text("tag", tag, MAX_TAG_LEN)?;
    }
    Ok(())
}
