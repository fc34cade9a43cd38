/// Content script: everything injected into the host page
pub mod button;
pub mod controller;
pub mod dom;
pub mod feedback;
pub mod observer;
pub mod row;
pub mod style;

pub use button::{ButtonState, PinButtonInjector};
pub use controller::ContentController;
pub use row::{RenderOutcome, RowRenderer};
