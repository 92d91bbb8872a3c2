mod helpers;
mod ingredient;
mod transfer;

pub(crate) use ingredient::{cmd_add, cmd_delete, cmd_rescale, cmd_show};
pub(crate) use transfer::{cmd_export, cmd_import};
