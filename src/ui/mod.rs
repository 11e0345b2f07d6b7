/// UI layer: panels, shared widgets, and one module per page.
pub mod about;
pub mod descriptive;
pub mod map;
pub mod overview;
pub mod panels;
pub mod predictor;
pub mod widgets;
