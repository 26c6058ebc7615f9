#![forbid(unsafe_code)]

mod create;
mod delete;
mod edit;
mod get;
mod list;
