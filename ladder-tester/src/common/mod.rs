pub mod util;

pub use util::{load_config, split_csv};
