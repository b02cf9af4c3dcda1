// Coupon redemption.
//
// The store's conditional `redeem` is the only guard against two
// simultaneous redemptions of one code: the "still unredeemed" check and
// the write happen in a single statement.

use crate::core::accounts::AccountStore;
use crate::core::StoreError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// DOMAIN MODELS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coupon {
    pub code: String,
    pub amount: i64,
    /// `None` while unredeemed. Immutable once set.
    pub used_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
}

impl Coupon {
    pub fn is_redeemed(&self) -> bool {
        self.used_by.is_some()
    }
}

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error)]
pub enum CouponError {
    #[error("Coupon {0} does not exist")]
    NotFound(String),

    #[error("Coupon {0} has already been redeemed")]
    AlreadyRedeemed(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

// ============================================================================
// STORAGE TRAIT
// ============================================================================

#[async_trait]
pub trait CouponStore: Send + Sync {
    /// Insert an unredeemed coupon. Returns false if the code already exists.
    async fn create(&self, code: &str, amount: i64) -> Result<bool, StoreError>;

    async fn get(&self, code: &str) -> Result<Option<Coupon>, StoreError>;

    /// Mark the coupon redeemed by `account_id` only if nobody redeemed it yet.
    /// Returns whether this call performed the redemption.
    async fn redeem(&self, code: &str, account_id: &str) -> Result<bool, StoreError>;
}

// ============================================================================
// CORE SERVICE
// ============================================================================

pub struct CouponService<C: CouponStore, A: AccountStore> {
    coupons: C,
    accounts: A,
}

impl<C: CouponStore, A: AccountStore> CouponService<C, A> {
    pub fn new(coupons: C, accounts: A) -> Self {
        Self { coupons, accounts }
    }

    pub async fn create(&self, code: &str, amount: i64) -> Result<bool, CouponError> {
        let created = self.coupons.create(code, amount).await?;
        if created {
            info!(code, amount, "Created coupon");
        }
        Ok(created)
    }

    /// Redeem a code for an account and credit its amount.
    /// Returns the amount credited.
    pub async fn redeem(&self, code: &str, account_id: &str) -> Result<i64, CouponError> {
        let coupon = self
            .coupons
            .get(code)
            .await?
            .ok_or_else(|| CouponError::NotFound(code.to_string()))?;

        if coupon.is_redeemed() {
            return Err(CouponError::AlreadyRedeemed(code.to_string()));
        }

        if self.accounts.get(account_id).await?.is_none() {
            return Err(CouponError::AccountNotFound(account_id.to_string()));
        }

        if !self.coupons.redeem(code, account_id).await? {
            warn!(code, account_id, "Lost coupon redemption race");
            return Err(CouponError::AlreadyRedeemed(code.to_string()));
        }

        if !self.accounts.adjust_currency(account_id, coupon.amount).await? {
            warn!(code, account_id, "Coupon consumed but account vanished before credit");
            return Err(CouponError::AccountNotFound(account_id.to_string()));
        }
        info!(code, account_id, amount = coupon.amount, "Redeemed coupon");
        Ok(coupon.amount)
    }
}

// ============================================================================
// TESTS
// ============================================================================
