pub mod body;
pub mod query;

pub use body::BodyValidator;
pub use query::QueryValidator;
