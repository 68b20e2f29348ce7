//! Vendor repository for database operations.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use megashop_core::{Credit, Email, VendorId, VendorStatus};

use super::shops::insert_shop;
use super::{RepositoryError, bounded, conflict_on_unique};
use crate::models::{BillingDetails, NewShop, NewVendor, Shop, Vendor, VendorCredentials};
use crate::store::VendorStore;

macro_rules! vendor_columns {
    () => {
        "id, email, name, company_name, contact_person, status, credit_balance, ico, dic, \
         ic_dph, billing_address, billing_city, billing_zip, billing_country, phone, \
         created_at, updated_at"
    };
}

#[derive(Debug, sqlx::FromRow)]
struct VendorRow {
    id: VendorId,
    email: String,
    name: String,
    company_name: String,
    contact_person: Option<String>,
    status: VendorStatus,
    credit_balance: Credit,
    ico: Option<String>,
    dic: Option<String>,
    ic_dph: Option<String>,
    billing_address: Option<String>,
    billing_city: Option<String>,
    billing_zip: Option<String>,
    billing_country: Option<String>,
    phone: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<VendorRow> for Vendor {
    type Error = RepositoryError;

    fn try_from(r: VendorRow) -> Result<Self, Self::Error> {
        let email = Email::parse(&r.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        Ok(Self {
            id: r.id,
            email,
            name: r.name,
            company_name: r.company_name,
            contact_person: r.contact_person,
            status: r.status,
            credit_balance: r.credit_balance,
            billing: BillingDetails {
                ico: r.ico,
                dic: r.dic,
                ic_dph: r.ic_dph,
                address: r.billing_address,
                city: r.billing_city,
                zip: r.billing_zip,
                country: r.billing_country,
                phone: r.phone,
                ..BillingDetails::default()
            },
            created_at: r.created_at,
            updated_at: r.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
    #[sqlx(flatten)]
    vendor: VendorRow,
    password_hash: String,
}

/// Repository for vendor database operations.
#[derive(Clone)]
pub struct VendorRepository {
    pool: PgPool,
    timeout: Duration,
}

impl VendorRepository {
    /// Create a new vendor repository.
    #[must_use]
    pub const fn new(pool: PgPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl VendorStore for VendorRepository {
    async fn find_credentials_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<VendorCredentials>, RepositoryError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, CredentialsRow>(concat!(
                "SELECT ",
                vendor_columns!(),
                ", password_hash FROM vendor WHERE email = $1"
            ))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await?;

            let Some(r) = row else {
                return Ok(None);
            };

            Ok(Some(VendorCredentials {
                vendor: Vendor::try_from(r.vendor)?,
                password_hash: r.password_hash,
            }))
        })
        .await
    }

    async fn get(&self, id: VendorId) -> Result<Option<Vendor>, RepositoryError> {
        bounded(self.timeout, async {
            let row = sqlx::query_as::<_, VendorRow>(concat!(
                "SELECT ",
                vendor_columns!(),
                " FROM vendor WHERE id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

            row.map(Vendor::try_from).transpose()
        })
        .await
    }

    async fn email_exists(&self, email: &Email) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM vendor WHERE email = $1)")
                    .bind(email.as_str())
                    .fetch_one(&self.pool)
                    .await?;
            Ok(exists)
        })
        .await
    }

    async fn create_with_shop(
        &self,
        vendor: NewVendor,
        shop: NewShop,
    ) -> Result<(Vendor, Shop), RepositoryError> {
        bounded(self.timeout, async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query_as::<_, VendorRow>(concat!(
                "INSERT INTO vendor (id, email, password_hash, name, company_name, contact_person, status) \
                 VALUES ($1, $2, $3, $4, $5, $6, 'pending') \
                 RETURNING ",
                vendor_columns!()
            ))
            .bind(vendor.id)
            .bind(vendor.email.as_str())
            .bind(&vendor.password_hash)
            .bind(&vendor.name)
            .bind(&vendor.company_name)
            .bind(&vendor.contact_person)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| conflict_on_unique(e, "email"))?;

            let shop = insert_shop(&mut *tx, &shop).await?;

            tx.commit().await?;

            Ok((Vendor::try_from(row)?, shop))
        })
        .await
    }

    async fn approve(&self, id: VendorId) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let result = sqlx::query(
                "UPDATE vendor SET status = 'active', updated_at = NOW() \
                 WHERE id = $1 AND status = 'pending'",
            )
            .bind(id)
            .execute(&self.pool)
            .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn reject(&self, id: VendorId) -> Result<bool, RepositoryError> {
        bounded(self.timeout, async {
            let result =
                sqlx::query("UPDATE vendor SET status = 'rejected', updated_at = NOW() WHERE id = $1")
                    .bind(id)
                    .execute(&self.pool)
                    .await?;

            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn add_credit(&self, id: VendorId, amount: Credit) -> Result<Credit, RepositoryError> {
        bounded(self.timeout, async {
            let balance: Option<Credit> = sqlx::query_scalar(
                "UPDATE vendor SET credit_balance = credit_balance + $2, updated_at = NOW() \
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
