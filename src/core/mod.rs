pub mod compare;
pub mod io;
pub mod model;
pub mod table;
