//! 片尾字幕
//!
//! 字幕脚本每行一条，`<type>#<text>` 格式：
//!
//! | 类型 | 含义 |
//! |------|------|
//! | `t`  | 标题 |
//! | `c`  | 署名（没有类型前缀的行也是署名） |
//! | `i`  | 图片，`ui/<text>` |
//! | `s`  | 空白，像素数（乘以资源缩放） |
//! | `m`  | 音乐，`music/<text>`，滚动到时开始播放 |
//!
//! 脚本按语言查找 `ui/credits_<lang>.txt`，不存在时使用 `ui/credits.txt`。

use super::font::FontMetrics;
use crate::audio::AudioBackend;
use crate::i18n::localized_path;
use glam::Vec2;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// 脚本文件名（不含语言和扩展名）
pub const CREDITS_FILENAME: &str = "credits";
/// 音频后端中的音乐名
pub const CREDITS_MUSIC: &str = "credits.music";

#[derive(Error, Debug)]
pub enum CreditsError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Line {line}: invalid space '{value}'")]
    InvalidSpace { line: usize, value: String },

    #[error("Line {line}: unknown credit type '{ty}'")]
    UnknownType { line: usize, ty: char },
}

pub type CreditsResult<T> = Result<T, CreditsError>;

/// 字幕脚本的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreditLine {
    Title(String),
    Credit(String),
    Image(String),
    /// 空白（未缩放的像素）
    Space(u32),
    Music(String),
}

/// 解析字幕脚本
pub fn parse_credits(content: &str) -> CreditsResult<Vec<CreditLine>> {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| parse_line(i + 1, line))
        .collect()
}

fn parse_line(number: usize, line: &str) -> CreditsResult<CreditLine> {
    let mut chars = line.chars();
    let (ty, text) = match (chars.next(), chars.next()) {
        (Some(ty), Some('#')) => (ty, chars.as_str()),
        _ => return Ok(CreditLine::Credit(line.to_string())),
    };

    let text = text.to_string();
    match ty {
        't' => Ok(CreditLine::Title(text)),
        'c' => Ok(CreditLine::Credit(text)),
        'i' => Ok(CreditLine::Image(text)),
        'm' => Ok(CreditLine::Music(text)),
        's' => text
            .trim()
            .parse()
            .map(CreditLine::Space)
            .map_err(|_| CreditsError::InvalidSpace { line: number, value: text }),
        ty => Err(CreditsError::UnknownType { line: number, ty }),
    }
}

/// 加载本地化的字幕脚本（`<assets>/ui/credits[_<lang>].txt`）
pub fn load_credits(assets_root: &Path, locale: Option<&str>) -> CreditsResult<Vec<CreditLine>> {
    let path = localized_path(&assets_root.join("ui"), CREDITS_FILENAME, "txt", locale);
    let content = fs::read_to_string(&path).map_err(|source| CreditsError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(target: "credits", "Loading credits from {:?}", path);
    parse_credits(&content)
}

/// 字幕界面的输入
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditsInput {
    Escape,
    Back,
    TouchUp,
    Other,
}

/// 一帧中要绘制的元素
#[derive(Debug, Clone, PartialEq)]
pub enum CreditDraw {
    Title { text: String, x: f32, y: f32 },
    Credit { text: String, x: f32, y: f32 },
    Image { name: String, x: f32, y: f32 },
}

/// 绘制使用的字体
pub struct CreditsStyle<'a> {
    pub title_font: &'a dyn FontMetrics,
    pub font: &'a dyn FontMetrics,
}

/// 片尾字幕滚动
///
/// `head` 之前的行已经滚出屏幕顶部，不再处理；`scroll_y` 是 `head` 行的基准位置。
#[derive(Debug)]
pub struct CreditsScroller {
    lines: Vec<CreditLine>,
    head: usize,
    scroll_y: f32,
    /// 像素/秒
    speed: f32,
    scale: f32,
    screen: Vec2,
    images: HashMap<String, Vec2>,
    played: HashSet<usize>,
    finished: bool,
}

impl CreditsScroller {
    /// `speed` 是已经乘以界面缩放的滚动速度，`scale` 是资源缩放
    pub fn new(lines: Vec<CreditLine>, speed: f32, scale: f32, screen: Vec2, title_line_height: f32) -> Self {
        Self {
            lines,
            head: 0,
            scroll_y: title_line_height,
            speed,
            scale,
            screen,
            images: HashMap::new(),
            played: HashSet::new(),
            finished: false,
        }
    }

    /// 脚本引用的图片，宿主加载后通过 `set_image_size` 告知尺寸
    pub fn image_names(&self) -> Vec<&str> {
        self.lines
            .iter()
            .filter_map(|l| match l {
                CreditLine::Image(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn set_image_size(&mut self, name: impl Into<String>, size: Vec2) {
        self.images.insert(name.into(), size);
    }

    pub fn resize(&mut self, screen: Vec2) {
        self.screen = screen;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn head(&self) -> usize {
        self.head
    }

    /// 处理输入，返回是否退出
    pub fn handle_input(&mut self, input: CreditsInput) -> bool {
        if matches!(input, CreditsInput::Escape | CreditsInput::Back | CreditsInput::TouchUp) {
            tracing::debug!(target: "credits", "Credits closed by {:?}", input);
            self.finished = true;
        }
        self.finished
    }

    /// 离开字幕界面，停止音乐
    pub fn close(&mut self, audio: &mut dyn AudioBackend) {
        self.finished = true;
        if audio.is_playing(CREDITS_MUSIC) {
            if let Err(e) = audio.stop(CREDITS_MUSIC) {
                tracing::warn!(target: "credits", "Failed to stop credits music: {}", e);
            }
        }
    }

    fn centered(&self, width: f32) -> f32 {
        (self.screen.x - width) / 2.0
    }

    /// 滚动并返回本帧的绘制列表
    ///
    /// 音乐行第一次进入处理范围时开始播放，替换正在播放的字幕音乐。
    pub fn update(&mut self, delta: f32, style: &CreditsStyle<'_>, audio: &mut dyn AudioBackend) -> Vec<CreditDraw> {
        let mut draws = Vec::new();
        if self.finished {
            return draws;
        }

        self.scroll_y += delta * self.speed;
        let mut y = self.scroll_y;
        let height = self.screen.y;

        if self.head >= self.lines.len() {
            tracing::info!(target: "credits", "Credits finished");
            self.finished = true;
            return draws;
        }

        for i in self.head..self.lines.len() {
            match &self.lines[i] {
                CreditLine::Title(text) => {
                    let lh = style.title_font.line_height();
                    y -= lh * 2.0;
                    draws.push(CreditDraw::Title {
                        text: text.clone(),
                        x: self.centered(style.title_font.text_width(text)),
                        y,
                    });
                    y -= lh;
                    if y > height + lh {
                        self.head = i + 1;
                        self.scroll_y -= lh * 3.0;
                    }
                }
                CreditLine::Credit(text) => {
                    let lh = style.font.line_height();
                    draws.push(CreditDraw::Credit {
                        text: text.clone(),
                        x: self.centered(style.font.text_width(text)),
                        y,
                    });
                    y -= lh;
                    if y > height + lh {
                        self.head = i + 1;
                        self.scroll_y -= lh;
                    }
                }
                CreditLine::Image(name) => {
                    let size = self.images.get(name).copied().unwrap_or_else(|| {
                        tracing::warn!(target: "credits", "Image size unknown: {}", name);
                        Vec2::ZERO
                    });
                    draws.push(CreditDraw::Image {
                        name: name.clone(),
                        x: self.centered(size.x),
                        y: y - size.y,
                    });
                    y -= size.y;
                    if y > height {
                        self.head = i + 1;
                        self.scroll_y -= size.y;
                    }
                }
                CreditLine::Space(px) => {
                    let space = (*px as f32 * self.scale).trunc();
                    y -= space;
                    if y - space > height {
                        self.head = i + 1;
                        self.scroll_y -= space;
                    }
                }
                CreditLine::Music(file) => {
                    if self.played.insert(i) {
                        let path = format!("music/{}", file);
                        tracing::debug!(target: "credits", "Playing {}", path);
                        if audio.is_playing(CREDITS_MUSIC) {
                            if let Err(e) = audio.stop(CREDITS_MUSIC) {
                                tracing::warn!(
                                    target: "credits",
                                    "Failed to stop credits music: {}",
                                    e
                                );
                            }
                        }
                        if let Err(e) = audio.play(CREDITS_MUSIC, &path, 1.0, false) {
                            tracing::warn!(target: "credits", "Failed to play {}: {}", path, e);
                        }
                    }
                    // no height of its own
                    if y > height {
                        self.head = i + 1;
                    }
                }
            }

            if y < 0.0 {
                break;
            }
        }
        draws
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCommand, MemoryAudio};
    use crate::core::error::{AudioError, AudioResult};
    use crate::ui::font::MonospaceFont;

    const SCRIPT: &str = "t#Credits\nJohn Doe\nc#Jane Roe\ns#40\ni#logo.png\nm#theme.ogg";

    #[test]
    fn test_parse() {
        let lines = parse_credits(SCRIPT).unwrap();
        assert_eq!(
            lines,
            vec![
                CreditLine::Title("Credits".to_string()),
                CreditLine::Credit("John Doe".to_string()),
                CreditLine::Credit("Jane Roe".to_string()),
                CreditLine::Space(40),
                CreditLine::Image("logo.png".to_string()),
                CreditLine::Music("theme.ogg".to_string()),
            ]
        );
        assert_eq!(parse_credits("").unwrap(), vec![]);
        assert_eq!(
            parse_credits("Issue #5 fixed").unwrap(),
            vec![CreditLine::Credit("Issue #5 fixed".to_string())]
        );
    }

    #[test]
    fn test_parse_errors() {
        let err = parse_credits("t#Title\ns#lots").unwrap_err();
        assert!(matches!(err, CreditsError::InvalidSpace { line: 2, .. }));
        assert_eq!(err.to_string(), "Line 2: invalid space 'lots'");

        assert!(matches!(
            parse_credits("x#what"),
            Err(CreditsError::UnknownType { line: 1, ty: 'x' })
        ));
    }

    #[test]
    fn test_load_localized() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("ui")).unwrap();
        fs::write(dir.path().join("ui/credits.txt"), "t#Credits").unwrap();
        fs::write(dir.path().join("ui/credits_es.txt"), "t#Créditos").unwrap();

        let es = load_credits(dir.path(), Some("es_ES")).unwrap();
        assert_eq!(es, vec![CreditLine::Title("Créditos".to_string())]);
        let fallback = load_credits(dir.path(), Some("de")).unwrap();
        assert_eq!(fallback, vec![CreditLine::Title("Credits".to_string())]);

        let missing = tempfile::tempdir().unwrap();
        assert!(matches!(load_credits(missing.path(), None), Err(CreditsError::Io { .. })));
    }

    fn scroller(script: &str) -> CreditsScroller {
        let mut s = CreditsScroller::new(parse_credits(script).unwrap(), 100.0, 1.0, Vec2::new(800.0, 600.0), 40.0);
        s.set_image_size("logo.png", Vec2::new(200.0, 100.0));
        s
    }

    #[test]
    fn test_music_starts_once() {
        let title = MonospaceFont { char_width: 20.0, line_height: 40.0 };
        let font = MonospaceFont::default();
        let style = CreditsStyle { title_font: &title, font: &font };
        let mut audio = MemoryAudio::new();
        let mut credits = scroller("m#theme.ogg\nJohn Doe");

        credits.update(0.1, &style, &mut audio);
        credits.update(0.1, &style, &mut audio);
        let plays = audio
            .commands()
            .into_iter()
            .filter(|c| matches!(c, AudioCommand::Play { .. }))
            .count();
        assert_eq!(plays, 1);
        assert!(audio.is_playing(CREDITS_MUSIC));

        credits.close(&mut audio);
        assert!(!audio.is_playing(CREDITS_MUSIC));
        assert!(credits.is_finished());
    }

    /// 停止总是失败的音频后端
    #[derive(Debug, Default)]
    struct StuckAudio {
        played: Vec<String>,
    }

    impl AudioBackend for StuckAudio {
        fn play(&mut self, _name: &str, path: &str, _volume: f32, _looped: bool) -> AudioResult<()> {
            self.played.push(path.to_string());
            Ok(())
        }

        fn stop(&mut self, name: &str) -> AudioResult<()> {
            Err(AudioError::Playback(format!("{} is stuck", name)))
        }

        fn is_playing(&self, _name: &str) -> bool {
            !self.played.is_empty()
        }

        fn stop_all(&mut self) {}
    }

    #[test]
    fn test_failed_stop_still_switches_music() {
        let title = MonospaceFont { char_width: 20.0, line_height: 40.0 };
        let font = MonospaceFont::default();
        let style = CreditsStyle { title_font: &title, font: &font };
        let mut audio = StuckAudio::default();
        let mut credits = scroller("m#theme.ogg\nm#finale.ogg\nJohn Doe");

        credits.update(0.1, &style, &mut audio);
        assert_eq!(audio.played, vec!["music/theme.ogg", "music/finale.ogg"]);

        credits.close(&mut audio);
        assert!(credits.is_finished());
    }

    #[test]
    fn test_draw_positions() {
        let title = MonospaceFont { char_width: 20.0, line_height: 40.0 };
        let font = MonospaceFont::default();
        let style = CreditsStyle { title_font: &title, font: &font };
        let mut credits = scroller(SCRIPT);

        let draws = credits.update(0.0, &style, &mut MemoryAudio::new());
        assert_eq!(
            draws[0],
            CreditDraw::Title { text: "Credits".to_string(), x: (800.0 - 140.0) / 2.0, y: -40.0 }
        );
        assert_eq!(draws.len(), 1);
    }

    #[test]
    fn test_scrolls_to_the_end() {
        let title = MonospaceFont { char_width: 20.0, line_height: 40.0 };
        let font = MonospaceFont::default();
        let style = CreditsStyle { title_font: &title, font: &font };
        let mut audio = MemoryAudio::new();
        let mut credits = scroller(SCRIPT);

        let mut frames = 0;
        while !credits.is_finished() && frames < 10_000 {
            let draws = credits.update(0.1, &style, &mut audio);
            if frames == 20 {
                assert!(draws.iter().any(|d| matches!(d, CreditDraw::Image { .. })));
            }
            frames += 1;
        }
        assert!(credits.is_finished());
        assert_eq!(credits.head(), 6);
    }

    #[test]
    fn test_exit_inputs() {
        let mut credits = scroller(SCRIPT);
        assert!(!credits.handle_input(CreditsInput::Other));
        assert!(credits.handle_input(CreditsInput::TouchUp));

        let mut credits = scroller(SCRIPT);
        assert!(credits.handle_input(CreditsInput::Escape));
    }
}
