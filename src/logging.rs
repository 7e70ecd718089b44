use std::fs::File;
use std::str::FromStr;

use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, SharedLogger, TermLogger, TerminalMode, WriteLogger};

use crate::config::LogConfig;
use crate::error::{IndexError, Result};


/// Installs the global logger: a terminal logger at `config.level`, plus a
/// debug-level file logger if `config.log_file` is set.
///
/// Can only succeed once per process.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    let level = LevelFilter::from_str(&config.level)
        .map_err(|_| IndexError::InvalidInput(format!("unknown log level {:?}", config.level)))?;

    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![
        TermLogger::new(level, Config::default(), TerminalMode::Mixed, ColorChoice::Auto),
    ];
    if let Some(path) = &config.log_file {
        loggers.push(WriteLogger::new(LevelFilter::Debug, Config::default(), File::create(path)?));
    }

    CombinedLogger::init(loggers)?;
    debug!("Logging initialised at level {level}");
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_level() {
        let config = LogConfig { level: "loud".into(), log_file: None };
        assert!(matches!(init_logging(&config), Err(IndexError::InvalidInput(_))));
    }

    #[test]
    fn second_init_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig { level: "off".into(), log_file: Some(dir.path().join("index.log")) };
        // the first call may already fail if some other test got there first
        let _ = init_logging(&config);
        assert!(matches!(init_logging(&config), Err(IndexError::Logger(_))));
    }
}
