pub mod profile;
pub mod risk;
pub mod schedule;
pub mod score;

pub use profile::*;
pub use risk::*;
pub use schedule::*;
pub use score::*;
