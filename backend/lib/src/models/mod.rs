pub mod articles;
pub mod comments;
pub mod page;
pub mod products;

pub use articles::*;
pub use comments::*;
pub use page::*;
pub use products::*;
