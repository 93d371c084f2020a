use crate::types::SubindexRef;
use alloc::format;
use alloc::string::String;

/// Trait for structs that provide metadata for logging
pub trait LogMetadata {
    fn meta(&self) -> String;
}

/// Field being handled when a log line is emitted.
#[derive(Debug, Clone, Copy)]
pub struct DecodeContext<'a> {
    pub profile: &'a str,
    pub index: Option<&'a str>,
    pub subindex: Option<SubindexRef<'a>>,
}

impl<'a> DecodeContext<'a> {
    pub fn profile(profile: &'a str) -> Self {
        DecodeContext {
            profile,
            index: None,
            subindex: None,
        }
    }

    pub fn field(profile: &'a str, index: &'a str, subindex: SubindexRef<'a>) -> Self {
        DecodeContext {
            profile,
            index: Some(index),
            subindex: Some(subindex),
        }
    }
}

impl LogMetadata for DecodeContext<'_> {
    fn meta(&self) -> String {
        let mut meta = format!("profile={}", self.profile);
        if let Some(index) = self.index {
            meta.push_str(", index=");
            meta.push_str(index);
        }
        if let Some(subindex) = self.subindex {
            meta.push_str(&format!(", subindex={}", subindex));
        }
        meta
    }
}

// =============================================
// Logging Macros (namespaced under crate::log)
// =============================================

// ===== my_info! =====
macro_rules! my_info {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        ::log::info!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
}

// ===== my_warn! =====
macro_rules! my_warn {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        ::log::warn!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
}

// ===== my_error! =====
macro_rules! my_error {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        let meta = $crate::log::LogMetadata::meta(&$ctx);
        ::log::error!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
    }};
}

// ===== my_debug! =====
macro_rules! my_debug {
    ($ctx:expr, $fmt:literal $(, $($arg:tt)+)?) => {{
        if ::log::log_enabled!(::log::Level::Debug) {
            let meta = $crate::log::LogMetadata::meta(&$ctx);
            ::log::debug!(concat!("[{}] ", $fmt), meta $(, $($arg)+)?);
        }
    }};
}

// Re-export macros for use in other files
pub(crate) use my_debug;
pub(crate) use my_error;
pub(crate) use my_info;
pub(crate) use my_warn;
