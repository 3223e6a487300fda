pub mod schedule;
pub mod scoreboard;
pub mod slack;
pub mod tasks;
