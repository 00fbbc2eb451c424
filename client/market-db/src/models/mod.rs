pub mod article;
pub mod comment;
pub mod product;

pub use article::*;
pub use comment::*;
pub use product::*;
