pub mod cache;
pub mod config;
pub mod db;
pub mod logging;
pub mod share;
#[cfg(test)]
mod test_utils;
