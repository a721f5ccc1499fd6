#![deny(rust_2018_idioms)]
#![deny(clippy::correctness)]
#![deny(clippy::perf)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod audit;
pub mod catalog;
pub mod detail;
pub mod error;
pub mod generator;
pub mod order;
pub mod output;
