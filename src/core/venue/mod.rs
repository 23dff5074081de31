// Venue name resolution

pub mod resolver;

pub use resolver::VenueMaps;
