//! Domain entities and value objects.
//!
//! Entities are passive records mirroring the relational schema; the only
//! behaviour they carry is timestamp bookkeeping and input normalisation.

pub mod entities;
pub mod value_objects;

pub use entities::*;
pub use value_objects::*;
