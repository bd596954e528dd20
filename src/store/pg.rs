//! Postgres store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::value_objects::{Money, Percent, Quantity};
use crate::domain::{
    Cart, CartOwner, Category, CustomerInfo, Discount, PaymentMethod, Product, Sale, SaleStatus,
    StatusJob,
};

use super::{
    CartStore, CategoryStore, DiscountStore, ProductFilter, ProductStore, SaleStore, StoreError,
    StoredCart,
};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    description: String,
    price: Decimal,
    original_price: Decimal,
    currency: String,
    stock_quantity: i32,
    on_discount: bool,
    discount_rate: Option<i16>,
    visible: bool,
    category_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductRow {
    fn into_product(self) -> Result<Product, StoreError> {
        let discount_rate = self
            .discount_rate
            .map(|raw| {
                u8::try_from(raw)
                    .ok()
                    .and_then(|v| Percent::new(v).ok())
                    .ok_or_else(|| StoreError::Decode(format!("discount rate {raw} out of range")))
            })
            .transpose()?;
        let stock = u32::try_from(self.stock_quantity)
            .map_err(|_| StoreError::Decode(format!("negative stock {}", self.stock_quantity)))?;
        Ok(Product {
            id: self.id,
            name: self.name,
            description: self.description,
            price: Money::new(self.price, &self.currency),
            original_price: Money::new(self.original_price, &self.currency),
            stock_quantity: Quantity::new(stock),
            on_discount: self.on_discount,
            discount_rate,
            visible: self.visible,
            category_id: self.category_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn find(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(ProductRow::into_product).transpose()
    }

    async fn list(
        &self,
        filter: &ProductFilter,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Product>, i64), StoreError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products \
             WHERE (visible OR $1) AND ($2::uuid IS NULL OR category_id = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(filter.include_hidden)
        .bind(filter.category)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM products \
             WHERE (visible OR $1) AND ($2::uuid IS NULL OR category_id = $2)",
        )
        .bind(filter.include_hidden)
        .bind(filter.category)
        .fetch_one(&self.pool)
        .await?;
        let products = rows
            .into_iter()
            .map(ProductRow::into_product)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((products, total.0))
    }

    async fn insert(&self, product: &Product) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO products \
             (id, name, description, price, original_price, currency, stock_quantity, \
              on_discount, discount_rate, visible, category_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.original_price.amount())
        .bind(product.price.currency())
        .bind(product.stock_quantity.value() as i32)
        .bind(product.on_discount)
        .bind(product.discount_rate.map(|r| r.value() as i16))
        .bind(product.visible)
        .bind(product.category_id)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, description = $3, price = $4, original_price = $5, \
             stock_quantity = $6, on_discount = $7, discount_rate = $8, visible = $9, \
             category_id = $10, updated_at = NOW() WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.price.amount())
        .bind(product.original_price.amount())
        .bind(product.stock_quantity.value() as i32)
        .bind(product.on_discount)
        .bind(product.discount_rate.map(|r| r.value() as i16))
        .bind(product.visible)
        .bind(product.category_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn restock(&self, id: Uuid, quantity: u32) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query_as::<_, ProductRow>(
            "UPDATE products SET stock_quantity = stock_quantity + $2, updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(quantity as i32)
        .fetch_optional(&self.pool)
        .await?;
        row.map(ProductRow::into_product).transpose()
    }

    async fn count_in_category(&self, category_id: Uuid) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[async_trait]
impl CartStore for PgStore {
    async fn load(&self, owner: &CartOwner) -> Result<StoredCart, StoreError> {
        match owner {
            CartOwner::Member(user_id) => {
                let row: Option<(Option<Json<Cart>>, i64)> =
                    sqlx::query_as("SELECT cart, cart_version FROM users WHERE id = $1")
                        .bind(user_id)
                        .fetch_optional(&self.pool)
                        .await?;
                let (cart, version) = row.ok_or(StoreError::NotFound("user"))?;
                Ok(StoredCart { cart: cart.map(|Json(c)| c), version })
            }
            CartOwner::Guest(session_id) => {
                let row: Option<(Json<Cart>, i64)> =
                    sqlx::query_as("SELECT cart, version FROM guest_carts WHERE session_id = $1")
                        .bind(session_id)
                        .fetch_optional(&self.pool)
                        .await?;
                Ok(match row {
                    Some((Json(cart), version)) => StoredCart { cart: Some(cart), version },
                    None => StoredCart { cart: None, version: 0 },
                })
            }
        }
    }

    async fn save(
        &self,
        owner: &CartOwner,
        cart: &Cart,
        expected_version: i64,
    ) -> Result<i64, StoreError> {
        match owner {
            CartOwner::Member(user_id) => {
                let row: Option<(i64,)> = sqlx::query_as(
                    "UPDATE users SET cart = $2, cart_version = cart_version + 1 \
                     WHERE id = $1 AND cart_version = $3 RETURNING cart_version",
                )
                .bind(user_id)
                .bind(Json(cart))
                .bind(expected_version)
                .fetch_optional(&self.pool)
                .await?;
                row.map(|(v,)| v).ok_or(StoreError::VersionConflict)
            }
            CartOwner::Guest(session_id) => {
                let row: Option<(i64,)> = sqlx::query_as(
                    "INSERT INTO guest_carts (session_id, cart, version, updated_at) \
                     VALUES ($1, $2, 1, NOW()) \
                     ON CONFLICT (session_id) DO UPDATE \
                     SET cart = EXCLUDED.cart, version = guest_carts.version + 1, updated_at = NOW() \
                     WHERE guest_carts.version = $3 \
                     RETURNING version",
                )
                .bind(session_id)
                .bind(Json(cart))
                .bind(expected_version)
                .fetch_optional(&self.pool)
                .await?;
                row.map(|(v,)| v).ok_or(StoreError::VersionConflict)
            }
        }
    }

    async fn clear(&self, owner: &CartOwner) -> Result<(), StoreError> {
        match owner {
            CartOwner::Member(user_id) => {
                sqlx::query("UPDATE users SET cart = NULL, cart_version = cart_version + 1 WHERE id = $1")
                    .bind(user_id)
                    .execute(&self.pool)
                    .await?;
            }
            CartOwner::Guest(session_id) => {
                sqlx::query("DELETE FROM guest_carts WHERE session_id = $1")
                    .bind(session_id)
                    .execute(&self.pool)
                    .await?;
            }
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: Uuid,
    sale_number: String,
    customer_name: String,
    customer_email: String,
    customer_phone: Option<String>,
    address: String,
    payment_method: String,
    cart: Json<Cart>,
    total: Decimal,
    currency: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SaleRow {
    fn into_sale(self) -> Result<Sale, StoreError> {
        let status = self
            .status
            .parse::<SaleStatus>()
            .map_err(|_| StoreError::Decode(format!("unknown sale status `{}`", self.status)))?;
        let payment_method = self
            .payment_method
            .parse::<PaymentMethod>()
            .map_err(|_| StoreError::Decode(format!("unknown payment method `{}`", self.payment_method)))?;
        Ok(Sale {
            id: self.id,
            sale_number: self.sale_number,
            customer: CustomerInfo {
                name: self.customer_name,
                email: self.customer_email,
                phone: self.customer_phone,
                address: self.address,
            },
            payment_method,
            cart: self.cart.0,
            total: Money::new(self.total, &self.currency),
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    sale_id: Uuid,
    from_status: String,
    to_status: String,
    due_at: DateTime<Utc>,
}

impl JobRow {
    fn into_job(self) -> Result<StatusJob, StoreError> {
        let parse = |raw: &str| {
            raw.parse::<SaleStatus>()
                .map_err(|_| StoreError::Decode(format!("unknown sale status `{raw}`")))
        };
        Ok(StatusJob {
            id: self.id,
            sale_id: self.sale_id,
            from_status: parse(&self.from_status)?,
            to_status: parse(&self.to_status)?,
            due_at: self.due_at,
        })
    }
}

#[async_trait]
impl SaleStore for PgStore {
    async fn finalize(&self, sale: &Sale, jobs: &[StatusJob]) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;
        for line in sale.cart().items() {
            let result = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $2, updated_at = NOW() \
                 WHERE id = $1 AND stock_quantity >= $2",
            )
            .bind(line.product_id)
            .bind(line.quantity as i32)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                // dropping the transaction rolls back earlier decrements
                return Err(StoreError::OutOfStock { product: line.name.clone() });
            }
        }
        sqlx::query(
            "INSERT INTO sales \
             (id, sale_number, customer_name, customer_email, customer_phone, address, \
              payment_method, cart, total, currency, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)",
        )
        .bind(sale.id())
        .bind(sale.sale_number())
        .bind(&sale.customer().name)
        .bind(&sale.customer().email)
        .bind(&sale.customer().phone)
        .bind(&sale.customer().address)
        .bind(sale.payment_method().as_str())
        .bind(Json(sale.cart()))
        .bind(sale.total().amount())
        .bind(sale.total().currency())
        .bind(sale.status().as_str())
        .bind(sale.created_at())
        .bind(sale.created_at())
        .execute(&mut *tx)
        .await?;
        for job in jobs {
            sqlx::query(
                "INSERT INTO sale_status_jobs (id, sale_id, from_status, to_status, due_at) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(job.id)
            .bind(job.sale_id)
            .bind(job.from_status.as_str())
            .bind(job.to_status.as_str())
            .bind(job.due_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Sale>, StoreError> {
        let row = sqlx::query_as::<_, SaleRow>("SELECT * FROM sales WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(SaleRow::into_sale).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Sale>, i64), StoreError> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT * FROM sales ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;
        let sales = rows
            .into_iter()
            .map(SaleRow::into_sale)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((sales, total.0))
    }

    async fn set_status(&self, id: Uuid, status: SaleStatus) -> Result<Option<Sale>, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, SaleRow>(
            "UPDATE sales SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&mut *tx)
        .await?;
        // an explicit admin write supersedes any scheduled transition
        sqlx::query("DELETE FROM sale_status_jobs WHERE sale_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        row.map(SaleRow::into_sale).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn due_jobs(&self, now: DateTime<Utc>) -> Result<Vec<StatusJob>, StoreError> {
        let rows = sqlx::query_as::<_, JobRow>(
            "SELECT * FROM sale_status_jobs WHERE due_at <= $1 ORDER BY due_at LIMIT 100",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(JobRow::into_job).collect()
    }

    async fn apply_job(&self, job: &StatusJob) -> Result<bool, StoreError> {
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE sales SET status = $2, updated_at = NOW() WHERE id = $1 AND status = $3",
        )
        .bind(job.sale_id)
        .bind(job.to_status.as_str())
        .bind(job.from_status.as_str())
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM sale_status_jobs WHERE id = $1")
            .bind(job.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct DiscountRow {
    id: Uuid,
    description: String,
    rate: i16,
    is_active: bool,
    promo_code: Option<String>,
    product_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DiscountRow {
    fn into_discount(self) -> Result<Discount, StoreError> {
        let rate = u8::try_from(self.rate)
            .ok()
            .and_then(|v| Percent::new(v).ok())
            .ok_or_else(|| StoreError::Decode(format!("discount rate {} out of range", self.rate)))?;
        Ok(Discount {
            id: self.id,
            description: self.description,
            rate,
            is_active: self.is_active,
            promo_code: self.promo_code,
            product_ids: self.product_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[async_trait]
impl DiscountStore for PgStore {
    async fn find(&self, id: Uuid) -> Result<Option<Discount>, StoreError> {
        let row = sqlx::query_as::<_, DiscountRow>("SELECT * FROM discounts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.map(DiscountRow::into_discount).transpose()
    }

    async fn find_active_by_code(&self, code: &str) -> Result<Option<Discount>, StoreError> {
        let row = sqlx::query_as::<_, DiscountRow>(
            "SELECT * FROM discounts WHERE promo_code = $1 AND is_active",
        )
        .bind(code)
        .fetch_optional(&self.pool)
        .await?;
        row.map(DiscountRow::into_discount).transpose()
    }

    async fn list(&self, limit: i64, offset: i64) -> Result<(Vec<Discount>, i64), StoreError> {
        let rows = sqlx::query_as::<_, DiscountRow>(
            "SELECT * FROM discounts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM discounts")
            .fetch_one(&self.pool)
            .await?;
        let discounts = rows
            .into_iter()
            .map(DiscountRow::into_discount)
            .collect::<Result<Vec<_>, _>>()?;
        Ok((discounts, total.0))
    }

    async fn insert(&self, discount: &Discount) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO discounts \
             (id, description, rate, is_active, promo_code, product_ids, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(discount.id())
        .bind(discount.description())
        .bind(discount.rate().value() as i16)
        .bind(discount.is_active())
        .bind(discount.promo_code())
        .bind(discount.product_ids())
        .bind(discount.created_at)
        .bind(discount.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, discount: &Discount) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE discounts SET description = $2, rate = $3, promo_code = $4, \
             product_ids = $5, updated_at = NOW() WHERE id = $1",
        )
        .bind(discount.id())
        .bind(discount.description())
        .bind(discount.rate().value() as i16)
        .bind(discount.promo_code())
        .bind(discount.product_ids())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM discounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<Discount, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row = sqlx::query_as::<_, DiscountRow>("SELECT * FROM discounts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound("discount"))?;
        let mut discount = row.into_discount()?;

        if active {
            discount
                .ensure_activatable()
                .map_err(|e| match e {
                    crate::domain::DiscountError::NoProducts => StoreError::Invalid(e.to_string()),
                    other => StoreError::Conflict(other.to_string()),
                })?;
            // lock the applicable products in a stable order so two
            // activations sharing a product serialize instead of deadlocking
            let rows = sqlx::query_as::<_, ProductRow>(
                "SELECT * FROM products WHERE id = ANY($1) ORDER BY id FOR UPDATE",
            )
            .bind(discount.product_ids())
            .fetch_all(&mut *tx)
            .await?;
            if rows.len() != discount.product_ids().len() {
                return Err(StoreError::NotFound("product"));
            }
            let mut products = rows
                .into_iter()
                .map(ProductRow::into_product)
                .collect::<Result<Vec<_>, _>>()?;
            for product in &products {
                if product.on_discount() {
                    return Err(StoreError::Conflict(format!(
                        "product `{}` already carries an active discount",
                        product.name()
                    )));
                }
            }
            for product in &mut products {
                product
                    .apply_discount(discount.rate())
                    .map_err(|e| StoreError::Conflict(e.to_string()))?;
                sqlx::query(
                    "UPDATE products SET price = $2, on_discount = TRUE, discount_rate = $3, \
                     updated_at = NOW() WHERE id = $1",
                )
                .bind(product.id())
                .bind(product.price().amount())
                .bind(discount.rate().value() as i16)
                .execute(&mut *tx)
                .await?;
            }
            discount.set_active_flag(true);
        } else {
            discount
                .ensure_deactivatable()
                .map_err(|e| StoreError::Conflict(e.to_string()))?;
            sqlx::query(
                "UPDATE products SET price = original_price, on_discount = FALSE, \
                 discount_rate = NULL, updated_at = NOW() WHERE id = ANY($1)",
            )
            .bind(discount.product_ids())
            .execute(&mut *tx)
            .await?;
            discount.set_active_flag(false);
        }

        sqlx::query("UPDATE discounts SET is_active = $2, updated_at = NOW() WHERE id = $1")
            .bind(discount.id())
            .bind(discount.is_active())
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(discount)
    }
}

#[derive(sqlx::FromRow)]
struct CategoryRow {
    id: Uuid,
    name: String,
    slug: String,
    description: Option<String>,
    parent_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Category {
            id: row.id,
            name: row.name,
            slug: row.slug,
            description: row.description,
            parent_id: row.parent_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn find(&self, id: Uuid) -> Result<Option<Category>, StoreError> {
        let row = sqlx::query_as::<_, CategoryRow>("SELECT * FROM categories WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Category::from))
    }

    async fn list(&self, parent: Option<Uuid>) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT * FROM categories WHERE $1::uuid IS NULL OR parent_id = $1 ORDER BY name",
        )
        .bind(parent)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn insert(&self, category: &Category) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO categories (id, name, slug, description, parent_id, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.parent_id)
        .bind(category.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE categories SET name = $2, slug = $3, description = $4, parent_id = $5 \
             WHERE id = $1",
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .bind(category.parent_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
