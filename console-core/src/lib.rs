//! Admin Console Core - Entity Types
//!
//! Pure data structures shared by the synchronization layer: identifiers,
//! resource entities, create/update payloads, the error taxonomy and the
//! sequential number generator. No I/O lives here.

mod entities;
mod enums;
mod error;
mod identity;
mod numbering;
mod payloads;
mod resource;

pub use entities::*;
pub use enums::*;
pub use error::*;
pub use identity::*;
pub use numbering::*;
pub use payloads::*;
pub use resource::*;
