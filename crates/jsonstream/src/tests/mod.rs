pub(crate) mod utils;

mod property_multivalue;
