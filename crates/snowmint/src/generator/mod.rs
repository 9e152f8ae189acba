mod atomic;
mod interface;
mod lock;
mod mutex;
mod options;
mod status;

pub use atomic::*;
pub use interface::*;
pub use lock::*;
pub use mutex::*;
pub use options::*;
pub use status::*;
