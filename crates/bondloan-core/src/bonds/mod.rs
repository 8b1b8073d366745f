//! The two instruments the borrowed capital is placed in.

pub mod fixed_coupon;
pub mod sip_growth;
