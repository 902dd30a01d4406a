// Presentation layer - Page seam, chart surfaces, renderers and the console
pub mod charts;
pub mod console;
pub mod dom;
pub mod element_ids;
pub mod renderers;
