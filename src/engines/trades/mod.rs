pub mod excursion;

pub use excursion::{compute_excursion, excursion_bars, Excursion, ExcursionBar};
