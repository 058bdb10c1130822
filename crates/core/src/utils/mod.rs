pub mod input;
pub mod time_utils;
