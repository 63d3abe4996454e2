/// Environment variable overriding [`Config::max_merge_depth`]
pub const MAX_MERGE_DEPTH_ENV: &str = "ROVER_VDOM_MAX_MERGE_DEPTH";

pub const DEFAULT_MAX_MERGE_DEPTH: usize = 64;

/// Settings captured by a component when it is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// How many nested object levels a `set_state` patch may merge into
    pub max_merge_depth: usize,
}

impl Config {
    pub fn new() -> Self {
        Self {
            max_merge_depth: DEFAULT_MAX_MERGE_DEPTH,
        }
    }

    /// Defaults, with overrides taken from the process environment.
    /// Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::new();
        if let Ok(raw) = std::env::var(MAX_MERGE_DEPTH_ENV) {
            match raw.trim().parse::<usize>() {
                Ok(depth) => config.max_merge_depth = depth,
                Err(_) => {
                    tracing::warn!("Ignoring {}={:?}: not a number", MAX_MERGE_DEPTH_ENV, raw);
                }
            }
        }
        config
    }

    pub fn with_max_merge_depth(mut self, depth: usize) -> Self {
        self.max_merge_depth = depth;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
