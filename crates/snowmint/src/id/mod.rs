mod interface;
mod snowflake;

pub use interface::*;
pub use snowflake::*;
