#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use config::{CliArgs, CliConfig, GeneratorKind, Mode};
use snowmint::{
    AtomicSnowflakeGenerator, LockSnowflakeGenerator, Snowflake, SnowflakeGenerator, SnowflakeId,
    WallClock, global,
};
use telemetry::init_telemetry;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = CliConfig::try_from(args)?;

    init_telemetry(config.log_json)?;
    tracing::debug!(?config, "starting");

    let mut out = io::stdout().lock();
    run(&config, WallClock::default(), &mut out)?;
    out.flush()?;
    Ok(())
}

fn run(config: &CliConfig, clock: WallClock, out: &mut impl Write) -> anyhow::Result<()> {
    match config.mode {
        Mode::Decode { ref ids } => {
            for &raw in ids {
                let id = SnowflakeId::from_raw(raw);
                if !id.is_valid() {
                    tracing::warn!(raw, "reserved bits set, decoding anyway");
                }
                write_id(out, id, &clock)?;
            }
        }
        Mode::Mint { count } => match config.generator {
            GeneratorKind::Lock => {
                let generator = LockSnowflakeGenerator::<SnowflakeId, _>::with_options(
                    config.identity,
                    clock,
                    config.options,
                )?;
                mint(out, &generator, count, &clock)?;
            }
            GeneratorKind::Atomic => {
                let generator = AtomicSnowflakeGenerator::<SnowflakeId, _>::with_options(
                    config.identity,
                    clock,
                    config.options,
                )?;
                mint(out, &generator, count, &clock)?;
            }
            GeneratorKind::Global => {
                let generator = global::install_with(global::DefaultGenerator::with_options(
                    config.identity,
                    clock,
                    config.options,
                )?)?;
                mint(out, generator, count, &clock)?;
            }
        },
    }
    Ok(())
}

fn mint<G>(out: &mut impl Write, generator: &G, count: usize, clock: &WallClock) -> anyhow::Result<()>
where
    G: SnowflakeGenerator<SnowflakeId>,
{
    for n in 0..count {
        let id = generator
            .generate()
            .with_context(|| format!("failed to mint id {} of {count}", n + 1))?;
        write_id(out, id, clock)?;
    }
    tracing::info!(count, identity = generator.identity(), "minted ids");
    Ok(())
}

fn write_id(out: &mut impl Write, id: SnowflakeId, clock: &WallClock) -> io::Result<()> {
    writeln!(
        out,
        "{id}\ttimestamp={}\tunix_ms={}\tidentity={}\tsequence={}",
        id.timestamp(),
        id.timestamp() + clock.epoch_millis(),
        id.identity(),
        id.sequence(),
    )
}

#[cfg(test)]
mod tests {
    use snowmint::{GeneratorOptions, UNIX_EPOCH};

    use super::*;

    fn config(generator: GeneratorKind, identity: u64, mode: Mode) -> CliConfig {
        CliConfig {
            identity,
            options: GeneratorOptions::default(),
            generator,
            log_json: false,
            mode,
        }
    }

    fn lines(out: Vec<u8>) -> Vec<String> {
        String::from_utf8(out)
            .unwrap()
            .lines()
            .map(str::to_owned)
            .collect()
    }

    /// Parses `id<TAB>timestamp=..<TAB>unix_ms=..<TAB>identity=..<TAB>sequence=..`.
    fn fields(line: &str) -> [u64; 5] {
        let mut parts = line.split('\t');
        let id = parts.next().unwrap().parse::<u64>().unwrap();
        let mut rest = parts.map(|p| p.split_once('=').unwrap().1.parse::<u64>().unwrap());
        [
            id,
            rest.next().unwrap(),
            rest.next().unwrap(),
            rest.next().unwrap(),
            rest.next().unwrap(),
        ]
    }

    #[test]
    fn writes_decoded_fields_with_unix_millis() {
        let id = SnowflakeId::from_components(5000, 12, 3);
        let mut out = Vec::new();
        write_id(&mut out, id, &WallClock::default()).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "20971569155\ttimestamp=5000\tunix_ms=1483228805000\tidentity=12\tsequence=3\n"
        );

        let mut out = Vec::new();
        write_id(&mut out, id, &WallClock::with_epoch(UNIX_EPOCH)).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "20971569155\ttimestamp=5000\tunix_ms=5000\tidentity=12\tsequence=3\n"
        );
    }

    #[test]
    fn decode_mode_prints_each_id() {
        let ids = vec![20_971_569_155, 0];
        let mut out = Vec::new();
        run(
            &config(GeneratorKind::Lock, 0, Mode::Decode { ids }),
            WallClock::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(
            lines(out),
            [
                "20971569155\ttimestamp=5000\tunix_ms=1483228805000\tidentity=12\tsequence=3",
                "0\ttimestamp=0\tunix_ms=1483228800000\tidentity=0\tsequence=0",
            ]
        );
    }

    #[test]
    fn decode_mode_still_prints_reserved_bit_ids() {
        let raw = (1_u64 << 63) | 20_971_569_155;
        let mut out = Vec::new();
        run(
            &config(GeneratorKind::Lock, 0, Mode::Decode { ids: vec![raw] }),
            WallClock::default(),
            &mut out,
        )
        .unwrap();

        assert_eq!(
            lines(out),
            ["9223372057826344963\ttimestamp=5000\tunix_ms=1483228805000\tidentity=12\tsequence=3"]
        );
    }

    fn assert_minted(out: Vec<u8>, identity: u64, count: usize) {
        let clock = WallClock::default();
        let lines = lines(out);
        assert_eq!(lines.len(), count);

        let mut last = None;
        for line in &lines {
            let [raw, timestamp, unix_ms, id_identity, sequence] = fields(line);
            let id = SnowflakeId::from_raw(raw);
            assert_eq!(id.timestamp(), timestamp);
            assert_eq!(unix_ms, timestamp + clock.epoch_millis());
            assert_eq!(id_identity, identity);
            assert_eq!(id.sequence(), sequence);
            if let Some(prev) = last {
                assert!(prev < raw, "{prev} !< {raw}");
            }
            last = Some(raw);
        }
    }

    #[test]
    fn mints_with_lock_and_atomic_generators() {
        for kind in [GeneratorKind::Lock, GeneratorKind::Atomic] {
            let mut out = Vec::new();
            run(
                &config(kind, 77, Mode::Mint { count: 5000 }),
                WallClock::default(),
                &mut out,
            )
            .unwrap();
            assert_minted(out, 77, 5000);
        }
    }

    // The only test in this binary that touches the process-wide default.
    #[test]
    fn global_mode_installs_default_once() {
        let mut out = Vec::new();
        run(
            &config(GeneratorKind::Global, 9, Mode::Mint { count: 3 }),
            WallClock::default(),
            &mut out,
        )
        .unwrap();
        assert_minted(out, 9, 3);
        assert_eq!(global::get().unwrap().identity(), 9);

        let err = run(
            &config(GeneratorKind::Global, 9, Mode::Mint { count: 1 }),
            WallClock::default(),
            &mut Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<snowmint::Error>(),
            Some(snowmint::Error::DefaultAlreadyInstalled)
        ));
    }

    struct FailingGenerator {
        options: GeneratorOptions,
    }

    impl SnowflakeGenerator<SnowflakeId> for FailingGenerator {
        fn identity(&self) -> u64 {
            1
        }

        fn options(&self) -> &GeneratorOptions {
            &self.options
        }

        fn try_poll_id(&self) -> snowmint::Result<snowmint::IdGenStatus<SnowflakeId>> {
            Err(snowmint::Error::ClockMovedBackwards { last: 10, now: 7 })
        }
    }

    #[test]
    fn mint_reports_which_id_failed() {
        let generator = FailingGenerator {
            options: GeneratorOptions::default(),
        };
        let mut out = Vec::new();
        let err = mint(&mut out, &generator, 2, &WallClock::default()).unwrap_err();

        assert_eq!(err.to_string(), "failed to mint id 1 of 2");
        assert!(matches!(
            err.root_cause().downcast_ref::<snowmint::Error>(),
            Some(snowmint::Error::ClockMovedBackwards { .. })
        ));
        assert!(out.is_empty());
    }
}
