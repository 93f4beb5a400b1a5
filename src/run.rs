mod args;
mod cli;
mod report;

pub(crate) use cli::as_cli;
