pub mod error;
pub mod fetcher;
pub mod migrator;
pub mod sink;
pub mod statement;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
