pub mod age;
pub mod links;
pub mod page;
pub mod table;

pub use page::Page;
pub use table::Table;
