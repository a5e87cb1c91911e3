mod core;
mod maintenance;

pub use core::{build_manager, cmd_backends, cmd_current, cmd_list, cmd_pick, cmd_set};
pub use maintenance::{cmd_sync, cmd_thumbs};
