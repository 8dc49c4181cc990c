//! 可变参数的便捷封装：属性名列表（`IntoProps`）与 `and!` / `or!`。

/// 可以转换为属性名列表的类型：`&str`、`String`、数组、切片、`Vec`。
pub trait IntoProps {
    fn into_props(self) -> Vec<String>;
}

impl IntoProps for String {
    fn into_props(self) -> Vec<String> {
        vec![self]
    }
}

impl IntoProps for &str {
    fn into_props(self) -> Vec<String> {
        vec![self.to_string()]
    }
}

impl<const N: usize, T> IntoProps for [T; N]
where
    T: Into<String>,
{
    fn into_props(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T> IntoProps for &[T]
where
    T: Into<String> + Clone,
{
    fn into_props(self) -> Vec<String> {
        self.iter().cloned().map(Into::into).collect()
    }
}

impl<T> IntoProps for Vec<T>
where
    T: Into<String>,
{
    fn into_props(self) -> Vec<String> {
        self.into_iter().map(Into::into).collect()
    }
}

/// `and![c1, c2, ...]`：至少一个子条件，因此不会失败。
#[macro_export]
macro_rules! and {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::condition::Condition::all_of($first, [$($rest),*])
    };
}

/// `or![c1, c2, ...]`：至少一个子条件，因此不会失败。
#[macro_export]
macro_rules! or {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::condition::Condition::any_of($first, [$($rest),*])
    };
}
