pub mod config;
pub mod export;
pub mod history;
pub mod input;
pub mod interaction;
pub mod session;
pub mod style;

pub use config::EditorConfig;
pub use export::{DesignRecord, ExportReceipt, Flattener};
pub use history::HistoryManager;
pub use input::{InputEvent, PointerKind};
pub use interaction::{Effect, GestureState, InteractionController};
pub use session::{Editor, ImageLoad};
pub use style::StyleApplicator;
