#![cfg(test)]

mod value_conservation_tests;
