#![no_std]
#![no_main]

pub mod adc;
pub mod config;
pub mod debug;
pub mod serial;
pub mod systick;
