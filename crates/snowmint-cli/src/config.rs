use anyhow::{Context, bail};
use clap::{Parser, ValueEnum};
use core::time::Duration;
use snowmint::{Backoff, GeneratorOptions, RollbackPolicy, Snowflake, SnowflakeId};

/// Runtime configuration for the `snowmint` binary.
///
/// Every flag can also be supplied through the environment (or a `.env`
/// file), which is how deployments usually hand a host its identity.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowmint",
    version,
    about = "Mint or decode time-ordered 64-bit Snowflake IDs"
)]
pub struct CliArgs {
    /// Identity of this host. Must be unique among all concurrently running
    /// generators and fit the 10-bit identity field (0..=1023).
    ///
    /// Environment variable: `SNOWMINT_IDENTITY`
    #[arg(long, env = "SNOWMINT_IDENTITY", default_value_t = 0, allow_negative_numbers = true)]
    pub identity: i64,

    /// Number of IDs to mint.
    ///
    /// Environment variable: `SNOWMINT_COUNT`
    #[arg(short = 'n', long, env = "SNOWMINT_COUNT", default_value_t = 1)]
    pub count: usize,

    /// What to do when the wall clock reads behind the last issued ID.
    ///
    /// Environment variable: `SNOWMINT_ROLLBACK`
    #[arg(long, env = "SNOWMINT_ROLLBACK", value_enum, default_value_t = RollbackArg::Wait)]
    pub rollback: RollbackArg,

    /// How to wait while the generator is pending.
    ///
    /// Environment variable: `SNOWMINT_BACKOFF`
    #[arg(long, env = "SNOWMINT_BACKOFF", value_enum, default_value_t = BackoffArg::Sleep)]
    pub backoff: BackoffArg,

    /// Give up on a single ID after waiting this many milliseconds for the
    /// clock. Unbounded when omitted.
    ///
    /// Environment variable: `SNOWMINT_TIMEOUT_MS`
    #[arg(long, env = "SNOWMINT_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Generator implementation to mint with.
    ///
    /// Environment variable: `SNOWMINT_GENERATOR`
    #[arg(long, env = "SNOWMINT_GENERATOR", value_enum, default_value_t = GeneratorKind::Lock)]
    pub generator: GeneratorKind,

    /// Emit logs as JSON on stderr.
    ///
    /// Environment variable: `SNOWMINT_LOG_JSON`
    #[arg(long, env = "SNOWMINT_LOG_JSON", default_value_t = false)]
    pub log_json: bool,

    /// Decode these raw IDs instead of minting new ones.
    #[arg(long, value_name = "ID", num_args = 1..)]
    pub decode: Vec<u64>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollbackArg {
    Wait,
    Reject,
    Reset,
}

impl From<RollbackArg> for RollbackPolicy {
    fn from(arg: RollbackArg) -> Self {
        match arg {
            RollbackArg::Wait => Self::Wait,
            RollbackArg::Reject => Self::Reject,
            RollbackArg::Reset => Self::Reset,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackoffArg {
    Spin,
    Yield,
    Sleep,
}

impl From<BackoffArg> for Backoff {
    fn from(arg: BackoffArg) -> Self {
        match arg {
            BackoffArg::Spin => Self::Spin,
            BackoffArg::Yield => Self::Yield,
            BackoffArg::Sleep => Self::Sleep,
        }
    }
}

/// Which generator the binary mints with.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorKind {
    /// `LockSnowflakeGenerator`
    Lock,
    /// `AtomicSnowflakeGenerator`
    Atomic,
    /// The process-wide default, installed on startup.
    Global,
}

#[derive(Debug, Clone)]
pub enum Mode {
    Mint { count: usize },
    Decode { ids: Vec<u64> },
}

#[derive(Debug, Clone)]
pub struct CliConfig {
    pub identity: u64,
    pub options: GeneratorOptions,
    pub generator: GeneratorKind,
    pub log_json: bool,
    pub mode: Mode,
}

impl TryFrom<CliArgs> for CliConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let identity = SnowflakeId::validate_identity(args.identity)
            .context("SNOWMINT_IDENTITY is not usable")?;

        let mode = if args.decode.is_empty() {
            if args.count == 0 {
                bail!("SNOWMINT_COUNT must be greater than 0");
            }
            Mode::Mint { count: args.count }
        } else {
            Mode::Decode { ids: args.decode }
        };

        let mut options = GeneratorOptions::default()
            .with_rollback(args.rollback.into())
            .with_backoff(args.backoff.into());
        if let Some(ms) = args.timeout_ms {
            if ms == 0 {
                bail!("SNOWMINT_TIMEOUT_MS must be greater than 0 when set");
            }
            options = options.with_timeout(Duration::from_millis(ms));
        }

        Ok(Self {
            identity,
            options,
            generator: args.generator,
            log_json: args.log_json,
            mode,
        })
    }
}
