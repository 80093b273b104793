use crate::logging::DEFAULT_FILTER;

/// Process-wide settings for binaries and demos built on termglyph.
#[derive(Debug, Clone)]
pub struct Config {
    /// `tracing` filter directives used when `RUST_LOG` is not set.
    pub log_filter: String,
    pub profiling: ProfilingMode,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            log_filter: DEFAULT_FILTER.to_string(),
            profiling: ProfilingMode::Off,
        }
    }
}

impl Config {
    /// Install logging (and profiling, if enabled) according to this config.
    pub fn apply(&self) {
        match std::env::var("RUST_LOG") {
            Ok(_) => crate::logging::init(),
            Err(_) => crate::logging::init_with_filter(&self.log_filter),
        }

        match self.profiling {
            ProfilingMode::Off => {}
            ProfilingMode::Scopes => puffin::set_scopes_on(true),
            #[cfg(feature = "profiling")]
            ProfilingMode::WithWebserver => {
                crate::profiling::init_profiling(crate::profiling::ProfilingBackend::PuffinHttp)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfilingMode {
    /// Profiling scopes are compiled in but not recorded
    Off,
    /// Scopes are recorded in-process
    Scopes,
    /// Scopes are recorded and served to `puffin_viewer` over HTTP
    #[cfg(feature = "profiling")]
    WithWebserver,
}
