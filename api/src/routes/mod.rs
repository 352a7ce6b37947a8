pub mod health_route;
pub mod normalize_route;
pub mod questions;
pub mod reports;

#[cfg(test)]
pub(crate) mod test_support;
