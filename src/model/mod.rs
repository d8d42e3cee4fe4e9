mod endpoint;
mod resource;

pub use endpoint::*;
pub use resource::*;
