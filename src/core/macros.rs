//! 核心宏定义
//!
//! 提供统一的宏来减少代码重复

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use adventure_engine::impl_default;
///
/// struct TextSpeed {
///     time_per_char: f32,
///     min_time: f32,
/// }
///
/// impl_default!(TextSpeed {
///     time_per_char: 0.08,
///     min_time: 1.5,
/// });
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
