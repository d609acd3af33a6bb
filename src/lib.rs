//! Route matching for file-system routed web applications.

pub mod config;
pub mod observability;
pub mod providers;
pub mod routing;

pub use config::schema::RouterConfig;
pub use providers::{ProviderError, RouteMatcherProvider};
pub use routing::{MatchOptions, RouteMatch, RouteMatcherManager, RoutingError};
