pub mod sink;
pub mod source;
pub mod target;

pub use sink::{InMemoryTrustLinkSink, LinkHandle, RecordedLink, TargetHandle, TrustLinkSink};
pub use source::{LinkConfiguration, LinkSource, LinkSourceProps, LogGroupFilter, MetricFilter};
pub use target::{LinkTarget, LinkTargetProps};
