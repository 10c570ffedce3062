//! Call-site annotation for log lines.
//!
//! The preferred path is explicit: [`CallSite::caller`] through
//! `#[track_caller]`, or the [`call_site!`](crate::call_site) macro which also
//! records the enclosing function. [`CallSite::from_frames`] resolves an
//! already captured stack, skipping [`CALLER_FRAME_INDEX`] frames: the logging
//! primitive itself and the wrapper it is called through.

use std::{borrow::Cow, fmt::Display, panic::Location};

pub const CALLER_FRAME_INDEX: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl Frame {
    pub fn new(file: impl Into<String>, function: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            function: function.into(),
            line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallSite {
    Unknown,
    Known {
        file: Cow<'static, str>,
        function: Option<Cow<'static, str>>,
        line: u32,
    },
}

impl CallSite {
    pub fn new(file: &'static str, function: &'static str, line: u32) -> Self {
        CallSite::Known {
            file: Cow::Borrowed(file),
            function: Some(Cow::Borrowed(function)),
            line,
        }
    }

    /// File and line of whoever called the `#[track_caller]` chain leading here.
    #[track_caller]
    pub fn caller() -> Self {
        Self::from_location(Location::caller())
    }

    pub fn from_location(location: &'static Location<'static>) -> Self {
        CallSite::Known {
            file: Cow::Borrowed(location.file()),
            function: None,
            line: location.line(),
        }
    }

    pub fn from_frames(frames: &[Frame]) -> Self {
        match frames.get(CALLER_FRAME_INDEX) {
            Some(frame) => CallSite::Known {
                file: Cow::Owned(frame.file.clone()),
                function: Some(Cow::Owned(frame.function.clone())),
                line: frame.line,
            },
            None => CallSite::Unknown,
        }
    }
}

impl Display for CallSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallSite::Unknown => write!(f, "Unknown"),
            CallSite::Known {
                file,
                function: Some(function),
                line,
            } => write!(f, "{}.{}:{}", short_file_name(file), function, line),
            CallSite::Known {
                file,
                function: None,
                line,
            } => write!(f, "{}:{}", short_file_name(file), line),
        }
    }
}

/// Final path segment, or the path itself when it has no separator.
pub fn short_file_name(path: &str) -> &str {
    path.rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(path)
}

/// Extracts the function name from the `type_name` of an item declared inside it,
/// e.g. `app::service::Service::hello::f` gives `hello`.
pub fn function_name(type_name: &'static str) -> &'static str {
    let mut path = type_name.strip_suffix("::f").unwrap_or(type_name);
    while let Some(outer) = path.strip_suffix("::{{closure}}") {
        path = outer;
    }

    path.rsplit("::").next().unwrap_or(path)
}

#[macro_export]
macro_rules! call_site {
    () => {{
        fn f() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::CallSite::new(
            file!(),
            $crate::logging::call_site::function_name(type_name_of(f)),
            line!(),
        )
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(count: usize) -> Vec<Frame> {
        (0..count)
            .map(|i| Frame::new(format!("/srv/app/src/f{}.rs", i), format!("fn{}", i), 10 + i as u32))
            .collect()
    }

    #[test]
    fn third_frame_is_the_call_site() {
        assert_eq!(CallSite::from_frames(&frames(4)).to_string(), "f2.rs.fn2:12");
        assert_eq!(CallSite::from_frames(&frames(3)).to_string(), "f2.rs.fn2:12");
    }

    #[test]
    fn short_stacks_are_unknown() {
        assert_eq!(CallSite::from_frames(&frames(0)), CallSite::Unknown);
        assert_eq!(CallSite::from_frames(&frames(1)).to_string(), "Unknown");
        assert_eq!(CallSite::from_frames(&frames(2)).to_string(), "Unknown");
    }

    #[test]
    fn file_without_separator_is_kept() {
        let frames = vec![
            Frame::new("a", "a", 1),
            Frame::new("b", "b", 2),
            Frame::new("main.rs", "main", 7),
        ];
        assert_eq!(CallSite::from_frames(&frames).to_string(), "main.rs.main:7");
    }

    #[test]
    fn short_file_names() {
        assert_eq!(short_file_name("src/logging/mod.rs"), "mod.rs");
        assert_eq!(short_file_name(r"src\logging\mod.rs"), "mod.rs");
        assert_eq!(short_file_name("lib.rs"), "lib.rs");
    }

    #[test]
    fn function_names_from_type_names() {
        assert_eq!(function_name("app::service::Service::hello::f"), "hello");
        assert_eq!(function_name("app::main::{{closure}}::{{closure}}::f"), "main");
        assert_eq!(function_name("hello"), "hello");
    }

    #[test]
    fn caller_uses_this_file() {
        let line = line!() + 1;
        let site = CallSite::caller();
        assert_eq!(site.to_string(), format!("call_site.rs:{}", line));
    }

    #[test]
    fn macro_captures_enclosing_function() {
        let line = line!() + 1;
        let site = crate::call_site!();
        assert_eq!(
            site.to_string(),
            format!("call_site.rs.macro_captures_enclosing_function:{}", line)
        );
    }
}
