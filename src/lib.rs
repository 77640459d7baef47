pub mod config;
pub mod fetch;
pub mod guide;
pub mod images;
pub mod palette;
pub mod process;

pub use config::Config;
pub use guide::{store::GuideStore, Guide, GuideView, ViewRequest};
pub use images::ImageIndex;
pub use process::{build_guide, AnswerRecord, CategoryIndex, RawRow};
