pub mod change;
pub mod preference;
pub mod reading;
pub mod state;

pub use change::*;
pub use preference::*;
pub use reading::*;
pub use state::*;
