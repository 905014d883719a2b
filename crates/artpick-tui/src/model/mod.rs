pub mod pick;
pub mod table;
