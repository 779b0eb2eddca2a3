// Hanko media conversion gateway library

pub mod composer;
pub mod constants;
pub mod error;
pub mod external;
pub mod logging;
