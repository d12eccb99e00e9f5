//! Insight generator adapters.

mod http_generator;
mod static_generator;

pub use http_generator::HttpInsightGenerator;
pub use static_generator::StaticInsightGenerator;
