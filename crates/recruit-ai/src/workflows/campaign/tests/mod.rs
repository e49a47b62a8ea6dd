mod common;
mod evaluation;
mod ranking;
mod sourcing;
