//! Repository for the product catalog.
//!
//! Holds the two nontrivial storage operations: the count-then-fetch
//! paginated list and the unordered bulk insert with per-item reject
//! bookkeeping.

use merx_core::query::{FilterValue, ListQuery, SortDirection};
use merx_core::types::ProductId;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::product::{BulkOutcome, BulkReject, CreateProduct, Product, ProductPage};

/// Column list for `products` queries.
const PRODUCT_COLUMNS: &str = "\
    id, product_type, product_code, product_group, \
    product_description, product_number_code, customs_details";

const INSERT_PRODUCT: &str = "\
    INSERT INTO products (\
        id, product_type, product_code, product_group, \
        product_description, product_number_code, customs_details\
    ) VALUES ($1, $2, $3, $4, $5, $6, $7)";

/// Provides create, bulk-insert, and paginated list operations on products.
pub struct ProductRepo;

impl ProductRepo {
    /// Insert a single product and return its assigned identity.
    pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<ProductId, sqlx::Error> {
        let id = Uuid::now_v7();
        bind_product(sqlx::query(INSERT_PRODUCT), id, input)
            .execute(pool)
            .await?;
        Ok(id)
    }

    /// List products matching `query`, with the unpaginated match count.
    ///
    /// The count and the page fetch are two separate statements with no
    /// shared snapshot; a write landing between them can make `total`
    /// disagree with `items`. That weak consistency is accepted for the
    /// catalog read path and is not compensated for here.
    pub async fn list(pool: &PgPool, query: &ListQuery) -> Result<ProductPage, sqlx::Error> {
        let (where_clause, binds) = build_predicate(&query.filters);

        let count_sql = format!("SELECT COUNT(*) FROM products {where_clause}");
        let mut count_query = sqlx::query_as::<_, (i64,)>(&count_sql);
        for value in &binds {
            count_query = count_query.bind(value);
        }
        let (total,) = count_query.fetch_one(pool).await?;

        let order_clause = match &query.sort_field {
            // Sort columns come from the translator's allow-list, never
            // straight from the request.
            Some(column) => {
                let direction = match query.sort_direction {
                    SortDirection::Ascending => "ASC",
                    SortDirection::Descending => "DESC",
                };
                format!("ORDER BY {column} {direction}")
            }
            None => String::new(),
        };

        let limit_idx = binds.len() + 1;
        let offset_idx = binds.len() + 2;
        let select_sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM products \
             {where_clause} {order_clause} LIMIT ${limit_idx} OFFSET ${offset_idx}"
        );

        let mut select_query = sqlx::query_as::<_, Product>(&select_sql);
        for value in &binds {
            select_query = select_query.bind(value);
        }
        let items = select_query
            .bind(query.per_page)
            .bind(query.offset())
            .fetch_all(pool)
            .await?;

        Ok(ProductPage {
            total,
            per_page: query.per_page,
            page: query.page,
            items,
        })
    }

    /// Insert a batch of products without ordering guarantees.
    ///
    /// Every item is attempted even when earlier ones are rejected; each
    /// reject becomes a [`BulkReject`] diagnostic instead of an error. The
    /// call itself fails only when no item could be attempted at all, i.e.
    /// when no connection could be acquired.
    pub async fn insert_many(
        pool: &PgPool,
        batch: &[CreateProduct],
    ) -> Result<BulkOutcome, sqlx::Error> {
        let mut outcome = BulkOutcome::default();
        if batch.is_empty() {
            return Ok(outcome);
        }

        let mut conn = pool.acquire().await?;

        for (index, item) in batch.iter().enumerate() {
            let id = Uuid::now_v7();
            let result = bind_product(sqlx::query(INSERT_PRODUCT), id, item)
                .execute(conn.as_mut())
                .await;

            match result {
                Ok(_) => outcome.inserted_ids.push(id),
                Err(err) => outcome.rejects.push(classify_reject(index, &err)),
            }
        }

        Ok(outcome)
    }
}

/// Bind the full column set of one product onto an insert statement.
fn bind_product<'q>(
    query: sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>,
    id: ProductId,
    input: &'q CreateProduct,
) -> sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments> {
    query
        .bind(id)
        .bind(&input.product_type)
        .bind(&input.product_code)
        .bind(input.product_group.as_deref())
        .bind(&input.product_description)
        .bind(&input.product_number_code)
        .bind(input.customs_details.as_ref().map(sqlx::types::Json))
}

/// Build the WHERE clause and bind values for a set of translated filters.
///
/// Column names in `filters` originate from the handler allow-lists, so
/// interpolating them is safe; filter values are always bound. Exact
/// filters compare against the text rendering of the column so the
/// identity column (UUID) can be matched by its string form.
fn build_predicate(filters: &[(String, FilterValue)]) -> (String, Vec<String>) {
    let mut conditions = Vec::new();
    let mut binds = Vec::new();

    for (column, value) in filters {
        let idx = binds.len() + 1;
        match value {
            FilterValue::Exact(v) => {
                conditions.push(format!("{column}::text = ${idx}"));
                binds.push(v.clone());
            }
            FilterValue::Pattern(v) => {
                conditions.push(format!("{column} ILIKE ${idx}"));
                binds.push(format!("%{v}%"));
            }
        }
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds)
}

/// Turn a per-item insert error into a reject diagnostic.
///
/// PostgreSQL error codes: 23505 unique violation, 23514 check violation.
fn classify_reject(index: usize, err: &sqlx::Error) -> BulkReject {
    if let sqlx::Error::Database(db_err) = err {
        match db_err.code().as_deref() {
            Some("23505") if db_err.constraint() == Some("uq_products_product_code") => {
                return BulkReject {
                    index,
                    field: "product_code".to_string(),
                    reason: "duplicate product code".to_string(),
                };
            }
            Some("23514") if db_err.constraint() == Some("ck_products_product_type") => {
                return BulkReject {
                    index,
                    field: "product_type".to_string(),
                    reason: "product type must be one of P, S, O".to_string(),
                };
            }
            _ => {}
        }
    }

    BulkReject {
        index,
        field: String::new(),
        reason: err.to_string(),
    }
}
