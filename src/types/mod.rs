pub mod artifact;
pub mod layout;

pub use artifact::*;
pub use layout::*;
