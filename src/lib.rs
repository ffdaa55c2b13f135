#![doc = include_str!("../README.md")]
#![allow(non_snake_case)]

pub mod network;
pub mod structure_learning;
pub mod tools;
