pub mod geometry;
pub mod navigation;
pub mod window_state;

pub use geometry::{DisplayRegion, WindowRectangle};
pub use navigation::{NavigationDecision, NavigationRequest};
pub use window_state::{PersistedState, StoreRecord};
