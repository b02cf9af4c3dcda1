// Coupon module - single-use codes that grant currency

mod coupon_service;

pub use coupon_service::{Coupon, CouponError, CouponService, CouponStore};
