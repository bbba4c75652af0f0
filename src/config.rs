use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ORIGIN: u16 = 0x8000;
pub const DEFAULT_INSTRUCTIONS: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("usage: {0} <program.bin> [origin] [instructions]")]
    MissingProgram(String),
    #[error("usage: {0} <program.bin> [origin]")]
    MissingImage(String),
    #[error("unexpected argument: {0:?}")]
    Unexpected(String),
    #[error("invalid hex address: {0:?}")]
    BadAddress(String),
    #[error("invalid instruction count: {0:?}")]
    BadCount(String),
}

/// Command-line settings for the headless runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub program: PathBuf,
    pub origin: u16,
    pub instructions: usize,
}

impl RunConfig {
    /// Parses `<program> [origin] [instructions]`. The first item is the
    /// binary name, as with `std::env::args`.
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let bin = args.next().unwrap_or_else(|| "nest".to_string());
        let program = args.next().ok_or(ConfigError::MissingProgram(bin))?;

        let origin = match args.next() {
            Some(text) => parse_hex(&text)?,
            None => DEFAULT_ORIGIN,
        };
        let instructions = match args.next() {
            Some(text) => text.parse().map_err(|_| ConfigError::BadCount(text))?,
            None => DEFAULT_INSTRUCTIONS,
        };

        Ok(RunConfig {
            program: PathBuf::from(program),
            origin,
            instructions,
        })
    }
}

/// Settings for tools that only place an image: `<program> [origin]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageConfig {
    pub program: PathBuf,
    pub origin: u16,
}

impl ImageConfig {
    pub fn from_args<I>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut args = args.into_iter();
        let bin = args.next().unwrap_or_else(|| "disasm".to_string());
        let program = args.next().ok_or(ConfigError::MissingImage(bin))?;

        let origin = match args.next() {
            Some(text) => parse_hex(&text)?,
            None => DEFAULT_ORIGIN,
        };
        if let Some(extra) = args.next() {
            return Err(ConfigError::Unexpected(extra));
        }

        Ok(ImageConfig {
            program: PathBuf::from(program),
            origin,
        })
    }
}

/// Accepts `8000`, `$8000` or `0x8000`.
pub fn parse_hex(text: &str) -> Result<u16, ConfigError> {
    let digits = text
        .strip_prefix('$')
        .or_else(|| text.strip_prefix("0x"))
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    u16::from_str_radix(digits, 16).map_err(|_| ConfigError::BadAddress(text.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn defaults_apply_when_only_program_given() {
        let config = RunConfig::from_args(args(&["nest", "prog.bin"])).unwrap();

        assert_eq!(config.program, PathBuf::from("prog.bin"));
        assert_eq!(config.origin, DEFAULT_ORIGIN);
        assert_eq!(config.instructions, DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn origin_and_count_are_parsed() {
        let config = RunConfig::from_args(args(&["nest", "p.bin", "$C000", "10"])).unwrap();
        assert_eq!(config.origin, 0xC000);
        assert_eq!(config.instructions, 10);
    }

    #[test]
    fn hex_prefixes() {
        assert_eq!(parse_hex("0600"), Ok(0x0600));
        assert_eq!(parse_hex("$fffc"), Ok(0xFFFC));
        assert_eq!(parse_hex("0x8000"), Ok(0x8000));
        assert_eq!(parse_hex("10000"), Err(ConfigError::BadAddress("10000".to_string())));
        assert_eq!(parse_hex("zz"), Err(ConfigError::BadAddress("zz".to_string())));
    }

    #[test]
    fn errors_name_the_problem() {
        assert_eq!(
            RunConfig::from_args(args(&["nest"])),
            Err(ConfigError::MissingProgram("nest".to_string()))
        );
        assert_eq!(
            RunConfig::from_args(args(&["nest", "p.bin", "8000", "many"])),
            Err(ConfigError::BadCount("many".to_string()))
        );
        assert_eq!(
            ConfigError::MissingProgram("nest".to_string()).to_string(),
            "usage: nest <program.bin> [origin] [instructions]"
        );
    }

    #[test]
    fn image_config_takes_program_and_origin_only() {
        let config = ImageConfig::from_args(args(&["disasm", "p.bin", "0600"])).unwrap();
        assert_eq!(config.program, PathBuf::from("p.bin"));
        assert_eq!(config.origin, 0x0600);

        let config = ImageConfig::from_args(args(&["disasm", "p.bin"])).unwrap();
        assert_eq!(config.origin, DEFAULT_ORIGIN);

        assert_eq!(
            ImageConfig::from_args(args(&["disasm", "p.bin", "0600", "10"])),
            Err(ConfigError::Unexpected("10".to_string()))
        );
        assert_eq!(
            ImageConfig::from_args(args(&["disasm"])).unwrap_err().to_string(),
            "usage: disasm <program.bin> [origin]"
        );
    }
}
