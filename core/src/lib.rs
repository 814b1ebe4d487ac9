pub mod activity_generator;
pub mod adoption_generator;
pub mod config;
pub mod customer_generator;
pub mod dates;
pub mod error;
pub mod framework_catalog;
pub mod pipeline;
pub mod rng;
pub mod store;
pub mod subscription_generator;
pub mod subscription_pricing;
pub mod types;
pub mod validation;
pub mod weights;
