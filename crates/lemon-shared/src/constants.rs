//! Application-wide constants

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;
pub const TOKEN_TYPE_ACCESS: &str = "access";
pub const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 86400;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_PASSWORD_LENGTH: usize = 128;
pub const MAX_TITLE_LENGTH: u64 = 255;
pub const MAX_CART_QUANTITY: i32 = 1_000;
/// Exclusive upper bound, in whole units, of any stored money amount (NUMERIC(10, 2)).
pub const MAX_MONEY_UNITS: i64 = 100_000_000;
