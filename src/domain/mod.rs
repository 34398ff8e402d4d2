mod category;
mod integrity;
mod quantity;
mod record;

pub use category::*;
pub use integrity::*;
pub use quantity::*;
pub use record::*;
