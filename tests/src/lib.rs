#![cfg(test)]
mod utils;
