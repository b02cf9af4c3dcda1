mod sqlite_coupon_store;

pub use sqlite_coupon_store::SqliteCouponStore;
