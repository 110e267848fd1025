mod info;
mod pack;

pub use info::cmd_info;
pub use pack::cmd_pack;
