use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::{schema::product, DbConnection};

/// Table that holds the Products listed on the market.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = product)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Price in the smallest currency unit.
    pub price: i64,
    pub tags: Vec<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Insert payload for [`Product::create`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = product)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: i64,
    pub tags: Vec<String>,
}

/// Partial update of a Product; `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = product)]
pub struct ProductChangeset {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub updated_at: Option<NaiveDateTime>,
}

impl Product {
    pub async fn create<'a>(
        conn: &mut DbConnection<'a>,
        new_product: NewProduct,
    ) -> Result<Self, diesel::result::Error> {
        let product = diesel::insert_into(product::table)
            .values(&new_product)
            .returning(Product::as_select())
            .get_result(conn)
            .await?;
        Ok(product)
    }

    pub async fn get_by_id<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
    ) -> Result<Option<Self>, diesel::result::Error> {
        product::table
            .filter(product::id.eq(id))
            .select(Product::as_select())
            .first(conn)
            .await
            .optional()
    }

    pub async fn update<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
        changes: ProductChangeset,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::update(product::table.filter(product::id.eq(id)))
            .set(&changes)
            .returning(Product::as_select())
            .get_result(conn)
            .await
            .optional()
    }

    pub async fn delete<'a>(
        conn: &mut DbConnection<'a>,
        id: i64,
    ) -> Result<Option<Self>, diesel::result::Error> {
        diesel::delete(product::table.filter(product::id.eq(id)))
            .returning(Product::as_select())
            .get_result(conn)
            .await
            .optional()
    }
}
