mod list;
mod manager;

pub(crate) use manager::attach_row_managers;
