//! Extension traits

mod depot;
mod result;
mod today;
mod user;

pub(crate) use depot::DepotExt as _;
pub(crate) use result::ResultExt as _;
pub(crate) use today::TodayExt as _;
pub(crate) use user::UserDepotExt as _;
