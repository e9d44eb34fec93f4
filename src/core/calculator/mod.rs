pub mod day_split;
