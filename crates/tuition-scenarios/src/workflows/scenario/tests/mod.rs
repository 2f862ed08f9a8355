mod common;
mod engine;
mod policy;
