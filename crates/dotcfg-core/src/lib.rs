//! dotcfg-core: path-addressed access to generic config trees
//!
//! A config is a tree of named records (Composite), keyed maps (Keyed),
//! 1-based sequences (Ordered) and scalar leaves. Everything is addressed with
//! dotted paths such as `Manager.Age`, `People.2.Name` or `PeopleMap.John.Age`:
//! - `get`/`set` a single leaf as a string; `set` with `""` on a map entry or
//!   sequence element deletes it, and setting past the end grows a sequence
//! - `list`/`keys` to enumerate every leaf path
//! - `dump`/`save`/`load` the whole tree as pretty JSON
//!
pub mod coerce;
pub mod config;
pub mod copy;
pub mod edit;
pub mod error;
pub mod flatten;
pub mod json;
pub mod model;
pub mod path;

pub use config::Config;
pub use copy::deep_copy;
pub use edit::{get_by_path, set_by_path};
pub use error::{ConfigError, Result};
pub use model::{
    Composite, Field, KeyKind, Keyed, MapKey, Node, NodeKind, Ordered, Scalar, ScalarKind,
};
pub use path::Path;
