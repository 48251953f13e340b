pub mod record;
pub mod section;

pub use record::{IdentityKey, RawRecord, Record};
pub use section::{LocaleVariant, PageRef, Section};
