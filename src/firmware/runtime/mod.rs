mod bootstrap;
mod range_task;

pub(crate) use bootstrap::run;
