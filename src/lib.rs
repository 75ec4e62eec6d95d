//! taskboard - a kanban task board for the terminal

pub mod audit;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod kanban_board;
pub mod store;
pub mod task;
pub mod ui;
