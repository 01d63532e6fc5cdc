pub mod command;
pub mod query;

#[cfg(all(test, feature = "postgres-tests"))]
mod tests;
