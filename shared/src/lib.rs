pub mod error;
pub mod format;
pub mod marker;
pub mod metric;
pub mod record;

pub use error::{LoadError, UnknownMetric};
pub use format::{format_currency, group_thousands};
pub use marker::{MarkerSpec, TooltipStyle};
pub use metric::*;
pub use record::*;
