pub mod error;
pub mod feature_flags;
pub mod requests;

// Case data store envelopes and the dissolution domain
pub mod bulk_action;
pub mod callback;
pub mod case;
pub mod ccd;
pub mod idam;
pub mod state;

pub use error::*;
pub use feature_flags::*;
pub use requests::*;

pub use bulk_action::*;
pub use callback::*;
pub use case::*;
pub use ccd::*;
pub use idam::*;
pub use state::*;
