pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Tunables for the dashboard, grouped by functional area.

    // =============================================================================
    // REGIONS
    // =============================================================================

    /// Region code for the whole country.
    pub const NATIONWIDE_REGION: &str = "CZ";

    /// Display name used for the nationwide scope.
    pub const NATIONWIDE_NAME: &str = "Czech Republic (Total)";

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Buffer size of the channel feeding the dashboard state.
    pub const MESSAGE_QUEUE_SIZE: usize = 256;

    /// Buffer size of the outgoing push-command channel.
    pub const PUSH_COMMAND_QUEUE_SIZE: usize = 32;

    // =============================================================================
    // REFRESH
    // =============================================================================

    /// Seconds between refresh ticks.
    pub const AUTO_REFRESH_INTERVAL_SECS: u64 = 10;

    /// Look-back window requested when the user picks "all available" data (7 days).
    pub const ALL_AVAILABLE_HOURS: u32 = 168;

    /// Window choices offered for the timeline and total-votes panels.
    pub const TIMELINE_RANGE_HOURS: [u32; 4] = [1, 3, 6, 24];

    /// Default number of candidates requested.
    pub const DEFAULT_CANDIDATE_LIMIT: u32 = 20;

    // =============================================================================
    // TREND
    // =============================================================================

    /// Percentage-point dead band below which a change counts as flat.
    pub const TREND_DEAD_BAND: f64 = 0.1;

    // =============================================================================
    // NETWORK CONFIGURATION
    // =============================================================================

    /// Push channel timing
    pub mod push {
        use std::time::Duration;

        /// Delay before reconnecting a dropped push channel (milliseconds)
        pub const RECONNECT_DELAY_MS: u64 = 2_000;

        /// Interval between keep-alive pings (seconds)
        pub const PING_INTERVAL_SECS: u64 = 25;

        pub const fn reconnect_delay() -> Duration {
            Duration::from_millis(RECONNECT_DELAY_MS)
        }

        pub const fn ping_interval() -> Duration {
            Duration::from_secs(PING_INTERVAL_SECS)
        }
    }

    /// REST client timing
    pub mod http {
        use std::time::Duration;

        pub const CONNECT_TIMEOUT_SECS: u64 = 5;
        pub const REQUEST_TIMEOUT_SECS: u64 = 10;

        pub const fn connect_timeout() -> Duration {
            Duration::from_secs(CONNECT_TIMEOUT_SECS)
        }

        pub const fn request_timeout() -> Duration {
            Duration::from_secs(REQUEST_TIMEOUT_SECS)
        }
    }
}
