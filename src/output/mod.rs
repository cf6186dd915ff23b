//! Output module for formatting, packing and writing chunk bundles.

mod bundle;
mod formatter;
mod writer;

pub use bundle::{Bundle, BundlePacker, Manifest, PackOutput};
pub use formatter::{
    FormattedUnit, OutputFormat, RecordFormatter, StructuredFormatter, TextFormatter,
};
pub use writer::BundleWriter;
