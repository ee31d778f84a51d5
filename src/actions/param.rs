//! 动作参数声明与解析

use crate::domain::errors::{ActionError, ActionResult};
use crate::domain::text::{Color, TextType};
use glam::Vec2;
use std::collections::HashMap;
use std::fmt;

/// 参数类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    String,
    Boolean,
    Float,
    Integer,
    /// `"x,y"`
    Vector2,
    /// `"r,g,b[,a]"` 或颜色名
    Color,
    Actor,
    Scene,
    Chapter,
    /// 字幕类型：`plain` / `rectangle` / `talk`
    TextType,
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParamType::String => "string",
            ParamType::Boolean => "boolean",
            ParamType::Float => "float",
            ParamType::Integer => "integer",
            ParamType::Vector2 => "vector2",
            ParamType::Color => "color",
            ParamType::Actor => "actor",
            ParamType::Scene => "scene",
            ParamType::Chapter => "chapter",
            ParamType::TextType => "text type",
        };
        f.write_str(name)
    }
}

/// 动作参数声明
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param {
    pub name: &'static str,
    pub desc: &'static str,
    pub ty: ParamType,
    pub mandatory: bool,
    pub default: Option<&'static str>,
}

impl Param {
    pub const fn new(name: &'static str, desc: &'static str, ty: ParamType) -> Self {
        Self {
            name,
            desc,
            ty,
            mandatory: false,
            default: None,
        }
    }

    pub const fn mandatory(mut self) -> Self {
        self.mandatory = true;
        self
    }

    pub const fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }
}

/// 检查必填参数，未声明的参数只记录调试日志
pub fn validate(
    action: &'static str,
    declared: &[Param],
    params: &HashMap<String, String>,
) -> ActionResult<()> {
    for p in declared.iter().filter(|p| p.mandatory) {
        match params.get(p.name) {
            Some(v) if !v.is_empty() => {}
            _ => {
                return Err(ActionError::MissingParam {
                    action,
                    param: p.name.to_string(),
                })
            }
        }
    }

    for key in params.keys() {
        // 'actor' is the implicit target of every action
        if key != "actor" && !declared.iter().any(|p| p.name == key) {
            tracing::debug!(
                target: "action",
                "Action '{}' ignores undeclared param '{}'",
                action,
                key
            );
        }
    }
    Ok(())
}

fn invalid(action: &'static str, param: &str, value: &str, reason: impl ToString) -> ActionError {
    ActionError::InvalidParam {
        action,
        param: param.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// 解析 `"x,y"` 形式的二维向量
pub fn parse_vector2(action: &'static str, param: &str, value: &str) -> ActionResult<Vec2> {
    let mut parts = value.split(',').map(str::trim);
    let (Some(x), Some(y), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(invalid(action, param, value, "expected 'x,y'"));
    };
    let x: f32 = x.parse().map_err(|e| invalid(action, param, value, e))?;
    let y: f32 = y.parse().map_err(|e| invalid(action, param, value, e))?;
    Ok(Vec2::new(x, y))
}

pub fn parse_float(action: &'static str, param: &str, value: &str) -> ActionResult<f32> {
    value
        .trim()
        .parse::<f32>()
        .map_err(|e| invalid(action, param, value, e))
}

pub fn parse_int(action: &'static str, param: &str, value: &str) -> ActionResult<i32> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|e| invalid(action, param, value, e))
}

/// 宽松的布尔解析：不区分大小写的 `"true"` 为真，其余为假
pub fn parse_bool(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

pub fn parse_color(action: &'static str, param: &str, value: &str) -> ActionResult<Color> {
    Color::parse(value).ok_or_else(|| invalid(action, param, value, "expected a color name or 'r,g,b[,a]'"))
}

pub fn parse_text_type(action: &'static str, param: &str, value: &str) -> ActionResult<TextType> {
    match value.trim().to_ascii_lowercase().as_str() {
        "plain" => Ok(TextType::Plain),
        "rectangle" => Ok(TextType::Rectangle),
        "talk" => Ok(TextType::Talk),
        _ => Err(invalid(action, param, value, "expected plain, rectangle or talk")),
    }
}

/// 读取非空的字符串参数
pub fn get_string(params: &HashMap<String, String>, name: &str) -> Option<String> {
    params.get(name).filter(|v| !v.is_empty()).cloned()
}
