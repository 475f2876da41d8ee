//! 统一的环境变量管理系统
//!
//! 提供类型安全、可验证的环境变量访问，配置管理器和命令行都通过这里读取覆盖值

use std::env;
use std::fmt;
use std::time::Duration;

/// 环境变量解析错误
#[derive(Debug, Clone)]
pub struct EnvError {
    pub variable: String,
    pub message: String,
}

impl fmt::Display for EnvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Environment variable '{}': {}", self.variable, self.message)
    }
}

impl std::error::Error for EnvError {}

pub type EnvResult<T> = Result<T, EnvError>;

/// 环境变量访问器特性
pub trait EnvVar<T> {
    const NAME: &'static str;
    const DEFAULT: Option<T>;
    const DESCRIPTION: &'static str;

    fn parse(value: &str) -> EnvResult<T>;

    fn get() -> EnvResult<T> {
        match env::var(Self::NAME) {
            Ok(value) => Self::parse(&value),
            Err(_) => {
                if let Some(default) = Self::DEFAULT {
                    Ok(default)
                } else {
                    Err(EnvError {
                        variable: Self::NAME.to_string(),
                        message: "Required environment variable not set".to_string(),
                    })
                }
            }
        }
    }

    /// 仅当变量被显式设置时返回值
    fn get_explicit() -> Option<EnvResult<T>> {
        env::var(Self::NAME).ok().map(|value| Self::parse(&value))
    }
}

/// 核心环境变量定义
pub mod core {
    use super::*;

    /// 日志级别
    pub struct LogLevel;
    impl EnvVar<String> for LogLevel {
        const NAME: &'static str = "FEEDFILTER_LOG_LEVEL";
        const DEFAULT: Option<String> = None;

        fn get() -> EnvResult<String> {
            match env::var(Self::NAME) {
                Ok(value) => Self::parse(&value),
                Err(_) => Ok("info".to_string()),
            }
        }
        const DESCRIPTION: &'static str = "Log level: trace, debug, info, warn, error";

        fn parse(value: &str) -> EnvResult<String> {
            match value.to_lowercase().as_str() {
                "trace" | "debug" | "info" | "warn" | "error" => Ok(value.to_lowercase()),
                _ => Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: format!(
                        "Invalid log level '{}'. Use: trace, debug, info, warn, error",
                        value
                    ),
                }),
            }
        }
    }

    /// 调试输出开关，打开后日志级别强制为 debug
    pub struct Debug;
    impl EnvVar<bool> for Debug {
        const NAME: &'static str = "FEEDFILTER_DEBUG";
        const DEFAULT: Option<bool> = Some(false);
        const DESCRIPTION: &'static str = "Force debug logging of every filter pass";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }
}

/// 过滤相关环境变量
pub mod filter {
    use super::*;

    /// 过滤器启用状态（覆盖设置存储中的值）
    pub struct Enabled;
    impl EnvVar<bool> for Enabled {
        const NAME: &'static str = "FEEDFILTER_ENABLED";
        const DEFAULT: Option<bool> = Some(true);
        const DESCRIPTION: &'static str = "Enable post filtering";

        fn parse(value: &str) -> EnvResult<bool> {
            parse_bool(value, Self::NAME)
        }
    }

    /// 设置存储文件路径
    pub struct SettingsPath;
    impl EnvVar<String> for SettingsPath {
        const NAME: &'static str = "FEEDFILTER_SETTINGS_PATH";
        const DEFAULT: Option<String> = None;
        const DESCRIPTION: &'static str = "Path of the JSON settings store";

        fn parse(value: &str) -> EnvResult<String> {
            let path = value.trim();
            if path.is_empty() {
                return Err(EnvError {
                    variable: Self::NAME.to_string(),
                    message: "Path must not be empty".to_string(),
                });
            }
            Ok(shellexpand::tilde(path).into_owned())
        }
    }

    /// 变更节流间隔（毫秒）
    pub struct ThrottleMs;
    impl EnvVar<Duration> for ThrottleMs {
        const NAME: &'static str = "FEEDFILTER_THROTTLE_MS";
        const DEFAULT: Option<Duration> = Some(Duration::from_millis(2000));
        const DESCRIPTION: &'static str = "Delay before a re-filter pass while passes run back to back";

        fn parse(value: &str) -> EnvResult<Duration> {
            let millis = parse_positive_usize(value, Self::NAME, 1, 60_000)?;
            Ok(Duration::from_millis(millis as u64))
        }
    }
}

/// 辅助函数：解析布尔值
fn parse_bool(value: &str, var_name: &str) -> EnvResult<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Invalid boolean value '{}'. Use: true/false, 1/0, yes/no, on/off", value),
        }),
    }
}

/// 辅助函数：解析范围内的正整数
fn parse_positive_usize(value: &str, var_name: &str, min: usize, max: usize) -> EnvResult<usize> {
    let num = value.trim().parse::<usize>().map_err(|_| EnvError {
        variable: var_name.to_string(),
        message: format!("Invalid number '{}'", value),
    })?;

    if num < min || num > max {
        return Err(EnvError {
            variable: var_name.to_string(),
            message: format!("Value {} out of range [{}, {}]", num, min, max),
        });
    }

    Ok(num)
}

/// 从环境变量汇总的配置
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log_level: String,
    pub debug: bool,
    pub enabled: Option<bool>,
    pub settings_path: Option<String>,
    pub throttle: Option<Duration>,
}

impl EnvConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> EnvResult<Self> {
        Ok(Self {
            log_level: core::LogLevel::get()?,
            debug: core::Debug::get()?,
            enabled: filter::Enabled::get_explicit().transpose()?,
            settings_path: filter::SettingsPath::get_explicit().transpose()?,
            throttle: filter::ThrottleMs::get_explicit().transpose()?,
        })
    }

    /// 实际生效的日志过滤级别
    pub fn effective_log_level(&self) -> &str {
        if self.debug {
            "debug"
        } else {
            &self.log_level
        }
    }
}

/// 环境变量文档生成器
pub fn generate_env_docs() -> String {
    let mut docs = String::new();
    docs.push_str("# Environment Variables Documentation\n\n");

    docs.push_str("## Core Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::LogLevel::NAME,
        core::LogLevel::DESCRIPTION,
        core::LogLevel::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        core::Debug::NAME,
        core::Debug::DESCRIPTION,
        core::Debug::DEFAULT
    ));

    docs.push_str("\n## Filter Configuration\n\n");
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        filter::Enabled::NAME,
        filter::Enabled::DESCRIPTION,
        filter::Enabled::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        filter::SettingsPath::NAME,
        filter::SettingsPath::DESCRIPTION,
        filter::SettingsPath::DEFAULT
    ));
    docs.push_str(&format!(
        "- `{}`: {} (default: {:?})\n",
        filter::ThrottleMs::NAME,
        filter::ThrottleMs::DESCRIPTION,
        filter::ThrottleMs::DEFAULT
    ));

    docs
}
