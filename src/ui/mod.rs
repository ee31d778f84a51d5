//! UI 逻辑模块
//!
//! 只包含与绘制无关的界面逻辑，绘制由宿主完成。
//!
//! ## 功能特性
//!
//! - 字幕布局（说话气泡居中于说话者、字幕行、屏幕居中）
//! - 片尾字幕脚本解析与滚动
//! - 饼菜单（查看 / 交谈 / 拾取）

pub mod credits;
pub mod font;
pub mod pie_menu;
pub mod subtitle;

pub use credits::{
    load_credits, parse_credits, CreditDraw, CreditLine, CreditsError, CreditsInput, CreditsScroller,
    CreditsStyle,
};
pub use font::{FontMetrics, MonospaceFont};
pub use pie_menu::{PieButton, PieMenu};
pub use subtitle::{SubtitleBox, SubtitleLayout};
