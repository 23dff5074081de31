// Date change detection

pub mod dates;

pub use dates::{dates_equal, instants_equal, parse_incoming_date, tokyo_offset};
