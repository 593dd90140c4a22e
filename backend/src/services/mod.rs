pub mod advice;
pub mod day_window;
pub mod entries;
pub mod formatter;
pub mod stats;
