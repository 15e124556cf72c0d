pub mod plan;
pub mod profile;
pub mod text;

pub use plan::*;
pub use profile::*;
pub use text::*;
