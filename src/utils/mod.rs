pub mod errors;
pub mod html;
pub mod locale;
pub mod page;
pub mod table;

pub use page::Page;
