/// Decimal precision for display (averages, percentages)
pub const DISPLAY_DECIMAL_PRECISION: u32 = 2;

/// Maximum fractional digits accepted for a money amount
pub const AMOUNT_SCALE: u32 = 2;

/// Largest accepted money amount (fits a DECIMAL(10,2) column)
pub const MAX_AMOUNT: &str = "99999999.99";

/// Number of sources returned by default in top-source rankings
pub const DEFAULT_TOP_SOURCES: usize = 5;

/// Number of recent entries shown on the income overview
pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 20;
pub const EMAIL_MAX_LENGTH: usize = 120;
pub const PASSWORD_MIN_LENGTH: usize = 6;

pub const SOURCE_MAX_LENGTH: usize = 100;
pub const GOAL_TITLE_MAX_LENGTH: usize = 100;
