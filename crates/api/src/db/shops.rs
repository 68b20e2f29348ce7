//! Shop repository for database operations.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, PgPool};

use megashop_core::{Credit, DisplayMode, Email, ShopId, ShopStatus, Slug, VendorId};

use super::{RepositoryError, bounded, conflict_on_unique};
use crate::models::{BillingDetails, NewShop, PendingShop, Shop};
use crate::store::ShopStore;

macro_rules! shop_columns {
    () => {
        "id, vendor_id, shop_name, shop_slug, shop_url, shop_logo, shop_status, display_mode, \
         credit_balance, billing_company, billing_ico, billing_dic, billing_ic_dph, \
         billing_address, billing_city, billing_zip, billing_country, billing_contact_person, \
         billing_phone, billing_email, created_at, approved_at, rejection_reason"
    };
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ShopRow {
    id: ShopId,
    vendor_id: VendorId,
    shop_name: String,
    shop_slug: String,
    shop_url: Option<String>,
    shop_logo: Option<String>,
    shop_status: ShopStatus,
    display_mode: DisplayMode,
    credit_balance: Credit,
    billing_company: Option<String>,
    billing_ico: Option<String>,
    billing_dic: Option<String>,
    billing_ic_dph: Option<String>,
    billing_address: Option<String>,
    billing_city: Option<String>,
    billing_zip: Option<String>,
    billing_country: Option<String>,
    billing_contact_person: Option<String>,
    billing_phone: Option<String>,
    billing_email: Option<String>,
    created_at: DateTime<Utc>,
    approved_at: Option<DateTime<Utc>>,
    rejection_reason: Option<String>,
}

impl From<ShopRow> for Shop {
    fn from(r: ShopRow) -> Self {
        Self {
            id: r.id,
            vendor_id: r.vendor_id,
            shop_name: r.shop_name,
            shop_slug: Slug::from_stored(r.shop_slug),
            shop_url: r.shop_url,
            shop_logo: r.shop_logo,
            status: r.shop_status,
            display_mode: r.display_mode,
            credit_balance: r.credit_balance,
            billing: BillingDetails {
                company: r.billing_company,
                ico: r.billing_ico,
                dic: r.billing_dic,
                ic_dph: r.billing_ic_dph,
                address: r.billing_address,
                city: r.billing_city,
                zip: r.billing_zip,
                country: r.billing_country,
                contact_person: r.billing_contact_person,
                phone: r.billing_phone,
                email: r.billing_email,
            },
            created_at: r.created_at,
            approved_at: r.approved_at,
            rejection_reason: r.rejection_reason,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PendingShopRow {
    #[sqlx(flatten)]
    shop: ShopRow,
    vendor_email: String,
    vendor_company: String,
}

/// Insert a shop row on any executor, so registration can reuse it inside
/// its transaction.
pub(crate) async fn insert_shop<'e, E>(executor: E, shop: &NewShop) -> Result<Shop, RepositoryError>
where
    E: PgExecutor<'e>,
{
    let b = &shop.billing;
    let row = sqlx::query_as::<_, ShopRow>(concat!(
        "INSERT INTO shop (id, vendor_id, shop_name, shop_slug, shop_url, shop_logo, \
         shop_status, display_mode, billing_company, billing_ico, billing_dic, billing_ic_dph, \
         billing_address, billing_city, billing_zip, billing_country, billing_contact_person, \
         billing_phone, billing_email) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19) \
         RETURNING ",
        shop_columns!()
    ))
    .bind(shop.id)
    .bind(shop.vendor_id)
    .bind(&shop.shop_name)
    .bind(shop.shop_slug.as_str())
    .bind(&shop.shop_url)
    .bind(&shop.shop_logo)
    .bind(shop.status)
    .bind(shop.display_mode)
    .bind(&b.company)
    .bind(&b.ico)
    .bind(&b.dic)
    .bind(&b.ic_dph)
    .bind(&b.address)
    .bind(&b.city)
    .bind(&b.zip)
    .bind(&b.country)
    .bind(&b.contact_person)
    .bind(&b.phone)
    .bind(&b.email)
    .fetch_one(executor)
    .await
    .map_err(|e| conflict_on_unique(e, "shop"))?;

    Ok(row.into())
}

/// Repository for shop database operations.
#[derive(Clone)]
pub struct ShopRepository {
    pool: PgPool,
    timeout: Duration,
}

impl ShopRepository {
    /// Create a new shop repository.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl ShopStore for ShopRepository {
    async fn list_by_vendor(&self, vendor_id: VendorId) -> Result<Vec<Shop>, RepositoryError> {
        bounded(self.timeout, async {
            let rows = sqlx::query_as::<_, ShopRow>(concat!(
                "SELECT ",
                shop_columns!(),
                " FROM shop WHERE vendor_id = $1 ORDER BY created_at ASC, id ASC"
            ))
            .bind(vendor_id)
            .fetch_all(&self.pool)
            .await?;

            Ok(rows.into_iter().map(Shop::from).collect())
        })
        .await
    }

    async fn get(&self, id: ShopId) -> Result<Option<Shop>, RepositoryError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, ShopRow>(concat!(
                "SELECT ",
                shop_columns!(),
                " FROM shop WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            Ok(row.map(Shop::from))
        })
        .await
    }

    async fn create(&self, shop: NewShop) -> Result<Shop, RepositoryError> {
        bounded(self.timeout, insert_shop(&self.pool, &shop)).await
    }

    async fn approve(&self, id: ShopId, at: DateTime<Utc>) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let result = sqlx::query(
                "UPDATE shop \
                 SET shop_status = 'active', approved_at = $2, updated_at = NOW() \
                 WHERE id = $1 AND shop_status = 'pending'",
            )
            .bind(id)
            .bind(at)
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn reject(&self, id: ShopId, reason: Option<String>) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let result = sqlx::query(
                "UPDATE shop \
                 SET shop_status = 'rejected', rejection_reason = $2, updated_at = NOW() \
                 WHERE id = $1",
            )
            .bind(id)
            .bind(reason)
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn list_pending(&self) -> Result<Vec<PendingShop>, RepositoryError> {
        bounded(self.timeout, async {
            let rows = sqlx::query_as::<_, PendingShopRow>(
                "SELECT s.*, v.email AS vendor_email, v.company_name AS vendor_company \
                 FROM shop s \
                 JOIN vendor v ON v.id = s.vendor_id \
                 WHERE s.shop_status = 'pending' \
                 ORDER BY s.created_at DESC, s.id DESC",
            )
            .fetch_all(&self.pool)
            .await?;

            rows.into_iter()
                .map(|r| {
                    let vendor_email = Email::parse(&r.vendor_email).map_err(|e| {
                        RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
                    })?;
                    Ok(PendingShop {
                        shop: r.shop.into(),
                        vendor_email,
                        vendor_company: r.vendor_company,
                    })
                })
                .collect()
        })
        .await
    }

    async fn add_credit(&self, id: ShopId, amount: Credit) -> Result<Credit, RepositoryError> {
        bounded(self.timeout, async {
            let balance: Option<Credit> = sqlx::query_scalar(
                "UPDATE shop SET credit_balance = credit_balance + $2, updated_at = NOW() \
                 WHERE id = $1 RETURNING credit_balance",
            )
            .bind(id)
            .bind(amount)
            .fetch_optional(&self.pool)
            .await?;

            balance.ok_or(RepositoryError::NotFound)
        })
        .await
    }
}
