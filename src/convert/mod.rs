pub mod bind;
pub mod detect;
pub mod document;
pub mod driver;
pub mod owner;
pub mod tinydns;
pub mod value;

pub use detect::ServerType;
pub use document::{Entry, MxEntry, RecordTable, RecordValue, Serial, SoaFields, ZoneDocument};
pub use driver::{ConvertOptions, convert_batch, convert_one};

/// A converted document plus the warnings discovered while assembling it
#[derive(Debug, Clone)]
pub struct Assembly {
    pub document: ZoneDocument,
    pub warnings: Vec<String>,
}
