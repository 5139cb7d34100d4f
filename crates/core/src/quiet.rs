use log::LevelFilter;

/// Lowers the global log level until dropped.
///
/// Used around subsetting and hinting, whose chatter is only interesting
/// when something fails.
#[must_use = "the previous level is restored when the guard is dropped"]
pub struct QuietLog {
    previous: LevelFilter,
}

impl QuietLog {
    pub fn new(level: LevelFilter) -> Self {
        let previous = log::max_level();
        if level < previous {
            log::set_max_level(level);
        }
        Self { previous }
    }
}

impl Drop for QuietLog {
    fn drop(&mut self) {
        log::set_max_level(self.previous);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_restores_previous_level() {
        log::set_max_level(LevelFilter::Info);
        {
            let _quiet = QuietLog::new(LevelFilter::Error);
            assert_eq!(log::max_level(), LevelFilter::Error);
            {
                let _louder = QuietLog::new(LevelFilter::Debug);
                assert_eq!(log::max_level(), LevelFilter::Error);
            }
            assert_eq!(log::max_level(), LevelFilter::Error);
        }
        assert_eq!(log::max_level(), LevelFilter::Info);
    }
}
