pub mod autosave;
pub mod builder;
pub mod clock;
pub mod config;
pub mod drag;
pub mod hit;
pub mod input;
pub mod store;

pub use builder::MenuBuilder;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{BuilderConfig, ConfigError};
pub use drag::{ActiveDrag, DragSession, DropRequest};
pub use input::{DragEvent, DragOver};
pub use store::{KeyValueStore, MemoryStore, StoreError};
