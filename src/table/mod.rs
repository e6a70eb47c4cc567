pub mod builder;
pub mod io;

pub use builder::{AddDbReport, IndexBuilder, LoadReport};
pub use io::{Dialect, ParseError, ReferenceKeys, TableFormat, TableReader, TableRow};
