#[path = "../common/mod.rs"]
mod common;

mod errors;
mod naming_props;
mod scenarios;
