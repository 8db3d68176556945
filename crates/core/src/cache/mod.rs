mod clock;
mod error;
mod keys;
mod memory;
mod serialization;
mod timed;
mod traits;

pub use clock::{ManualClock, SystemClock};
pub use error::{Result, StorageError};
pub use keys::{events_key, events_page_key, EVENTS_KEY};
pub use memory::MemoryStorage;
pub use serialization::{deserialize_entry, serialize_entry, CacheEntry, SerializationError};
pub use timed::TimedCache;
pub use traits::{Clock, Storage};
