//! 字体度量
//!
//! 布局逻辑只需要宽度和行高，字体栅格化由宿主提供。

use glam::Vec2;

/// 字体度量
pub trait FontMetrics {
    /// 文本单行宽度
    fn text_width(&self, text: &str) -> f32;

    fn line_height(&self) -> f32;

    fn space_width(&self) -> f32 {
        self.text_width(" ")
    }

    /// 按单词折行；单个超长单词独占一行
    fn wrap(&self, text: &str, max_width: f32) -> Vec<String> {
        let mut lines = Vec::new();
        for paragraph in text.split('\n') {
            let mut line = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if line.is_empty() {
                    word.to_string()
                } else {
                    format!("{} {}", line, word)
                };
                if !line.is_empty() && self.text_width(&candidate) > max_width {
                    lines.push(std::mem::replace(&mut line, word.to_string()));
                } else {
                    line = candidate;
                }
            }
            lines.push(line);
        }
        lines
    }

    /// 折行后的包围尺寸
    fn wrapped_bounds(&self, text: &str, max_width: f32) -> Vec2 {
        let lines = self.wrap(text, max_width);
        let width = lines
            .iter()
            .map(|l| self.text_width(l))
            .fold(0.0, f32::max);
        Vec2::new(width, lines.len() as f32 * self.line_height())
    }
}

/// 等宽字体
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceFont {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceFont {
    fn default() -> Self {
        Self {
            char_width: 10.0,
            line_height: 20.0,
        }
    }
}

impl FontMetrics for MonospaceFont {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }

    fn line_height(&self) -> f32 {
        self.line_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        let font = MonospaceFont::default();
        let lines = font.wrap("the quick brown fox", 100.0);
        assert_eq!(lines, vec!["the quick", "brown fox"]);
        assert_eq!(font.wrap("a\nb", 1000.0), vec!["a", "b"]);
        assert_eq!(font.wrap("extraordinarily", 50.0), vec!["extraordinarily"]);
    }

    #[test]
    fn test_wrapped_bounds() {
        let font = MonospaceFont::default();
        assert_eq!(font.wrapped_bounds("the quick brown fox", 100.0), Vec2::new(90.0, 40.0));
        assert_eq!(font.space_width(), 10.0);
    }
}
